// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types shared across the crate

mod accession;
mod request;

pub use accession::AccessionId;
pub use request::{Database, Endpoint, FetchRequest, ReturnFormat, SequenceWindow, Strand};
