// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod configuration;
mod enumerate;
mod options;


pub use configuration::{Configuration, Enumeration, GeneratorGroup, RejectedBinding};
pub use enumerate::{enumerate_configurations, Enumerator};
pub use options::{EnumerateOptions, KeyPolicy};
