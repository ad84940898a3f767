// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 启动 Prometheus 导出器并登记爬取流水线使用的计数器
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.listen_address, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(
        "registry_queries_total",
        "Registry queries by outcome (found, not_found, expired, error, timeout, session_unavailable)"
    );
    describe_counter!(
        "registry_sessions_acquired_total",
        "Portal sessions acquired from the registry"
    );
    describe_counter!(
        "crawl_records_saved_total",
        "Trademark records persisted by batch crawls"
    );
    describe_counter!(
        "lookup_requests_total",
        "Interactive lookups by result source"
    );
    describe_counter!(
        "marcia_count_requests_total",
        "MARCIA agent count requests by outcome"
    );
    describe_counter!(
        "attorney_brand_counts_total",
        "Attorney brand counts refreshed, by outcome"
    );

    info!("Metrics exporter listening on {}", addr);
}
