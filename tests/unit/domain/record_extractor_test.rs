// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use acervors::domain::models::trademark::{RecordStatus, TrademarkRecord};
use acervors::domain::services::record_extractor::extract;
use acervors::engines::session_manager::extract_view_state;

const RECORD_PAGE: &str = include_str!("../../fixtures/expediente_3544901.html");

fn record() -> TrademarkRecord {
    extract(RECORD_PAGE).expect("fixture has record data")
}

#[test]
fn test_fixture_general_data() {
    let record = record();
    let general = &record.general_data;

    assert_eq!(record.status, RecordStatus::Found);
    assert_eq!(record.application_number, "3544901");
    assert!(record.source.is_none());
    assert_eq!(general.application_number, "3544901");
    assert_eq!(general.registration_number, "2456789");
    assert_eq!(general.filing_date, "14/02/2025");
    assert_eq!(general.grant_date, "03/07/2025");
    assert_eq!(general.validity_date, "14/02/2035");
    assert_eq!(general.publication_date, "21/03/2025");
    assert_eq!(general.denomination, "AUSTIN VENOM");
    assert_eq!(general.mark_description, "Letras estilizadas en color negro");
    assert_eq!(general.application_type, "REGISTRO DE MARCA");
    assert_eq!(general.mark_type, "MIXTA");
}

#[test]
fn test_fixture_parties() {
    let record = record();

    let holder = &record.holder;
    assert_eq!(holder.name, "Jane Doe");
    assert_eq!(holder.address, "Av. Insurgentes Sur 1602");
    assert_eq!(holder.city, "Benito Juárez, Ciudad de México");
    assert_eq!(holder.postal_code, "03940");
    assert_eq!(holder.country, "MEXICO");
    assert_eq!(holder.nationality, "MEXICANA");
    assert!(holder.email.is_empty());

    let attorney = &record.attorney;
    assert_eq!(attorney.name, "María López Ramírez");
    assert_eq!(attorney.address, "Paseo de la Reforma 250, Piso 8");
    assert_eq!(attorney.city, "Cuauhtémoc, Ciudad de México");
    assert_eq!(attorney.postal_code, "06600");
    assert_eq!(attorney.email, "mlopez@despacho-lr.mx");
    assert_eq!(attorney.phone, "55 5555 0101");

    let establishment = &record.establishment;
    assert_eq!(establishment.address, "Calle Morelos 12");
    assert_eq!(establishment.city, "Guadalajara, Jalisco");
    assert_eq!(establishment.postal_code, "44100");
    assert_eq!(establishment.country, "MEXICO");
}

#[test]
fn test_fixture_goods_and_services() {
    assert_eq!(
        record().goods_and_services,
        "Prendas de vestir, calzado, artículos de sombrerería.; Venta al por menor de ropa & accesorios."
    );
}

#[test]
fn test_fixture_serializes_with_stable_field_names() {
    let value = serde_json::to_value(record()).unwrap();

    assert_eq!(value["status"], "found");
    assert!(value.get("source").is_none());
    assert_eq!(value["general_data"]["denomination"], "AUSTIN VENOM");
    assert_eq!(value["attorney"]["phone"], "55 5555 0101");
}

#[test]
fn test_fixture_view_state() {
    assert_eq!(
        extract_view_state(RECORD_PAGE).as_deref(),
        Some("-2871003211950044711:4127843071269371840")
    );
}
