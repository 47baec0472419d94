// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 the poc authors

//! Utility modules

pub mod math;
