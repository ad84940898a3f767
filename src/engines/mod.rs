// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod health_monitor;
pub mod marcia_client;
pub mod registry_client;
pub mod session_manager;
pub mod traits;
