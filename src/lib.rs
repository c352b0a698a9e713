// This file is part of the terraform-provider-catalog project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Terraform provider for the catalog management service
//!
//! The provider exposes the account settings, catalog objects, offerings and offering instances,
//! both as resources and as data sources.

pub mod account;
pub mod api;
pub mod config;
pub mod object;
pub mod offering;
pub mod offering_instance;
pub mod paginate;
pub mod patch;
pub mod session;
pub mod tracked;
pub mod wait;

mod attr;
mod convert;
mod errors;
mod provider;

pub use provider::CatalogProvider;
