// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

/// Default bound on value nesting, shared by encoder and decoder.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Configuration for an encoding or decoding session.
///
/// The same `Config` is handed to the `Encoder` and the `Decoder` and copied
/// into every write/read context they create.
///
/// ```rust
/// use lager_core::config::Config;
///
/// let config = Config::new().max_depth(32);
/// assert_eq!(config.get_max_depth(), 32);
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum nesting of composite values (slices, maps, structs, type tags).
    /// Pointers don't count: every pooled target starts again at depth zero.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Get maximum nesting depth.
    #[inline(always)]
    pub fn get_max_depth(&self) -> u32 {
        self.max_depth
    }
}
