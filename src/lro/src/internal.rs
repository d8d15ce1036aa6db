// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Support for the generated-style clients in this workspace.
//!
//! Applications should use the `poller()` methods of the request builders.
//! These functions may change without notice.

mod discovery;
pub use discovery::{DiscoveryOperation, new_discovery_poller, resume_discovery_poller};
