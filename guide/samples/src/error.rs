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


use gax::error::Error;

/// The resources created by the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Model,
    Version,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Version => write!(f, "version"),
        }
    }
}

/// The error returned by each step of the flow.
#[derive(thiserror::Error, Debug)]
pub enum StepError {
    /// The service rejected the request to create a resource.
    #[error("cannot create the {resource}: {source}")]
    Creation {
        resource: Resource,
        #[source]
        source: Error,
    },

    /// A status query failed, or the operation completed with an error.
    #[error("error waiting for operation {operation}: {source}")]
    Polling {
        operation: String,
        #[source]
        source: Error,
    },

    /// The operation was still running when the polling limits were reached.
    #[error("operation {operation} did not complete before the polling limits: {source}")]
    Timeout {
        operation: String,
        #[source]
        source: Error,
    },
}

impl StepError {
    pub(crate) fn polling(operation: &str, source: Error) -> Self {
        let operation = operation.to_string();
        if source.is_exhausted() {
            return Self::Timeout { operation, source };
        }
        Self::Polling { operation, source }
    }

    /// The underlying client error.
    pub fn source_error(&self) -> &Error {
        match self {
            Self::Creation { source, .. }
            | Self::Polling { source, .. }
            | Self::Timeout { source, .. } => source,
        }
    }

    /// The reason for the failure, as reported by the service if possible.
    ///
    /// This is the message in the service error, or the body of an HTTP error
    /// response that is not a service error. For any other error it is the
    /// error description.
    pub fn reason(&self) -> String {
        let source = self.source_error();
        if let Some(status) = source.status().filter(|s| !s.message.is_empty()) {
            return status.message.clone();
        }
        if let Some(payload) = source.http_payload().filter(|p| !p.is_empty()) {
            return String::from_utf8_lossy(payload).into_owned();
        }
        source.to_string()
    }

    /// The first line of the diagnostic printed for this error.
    pub fn headline(&self) -> String {
        match self {
            Self::Creation { resource, .. } => {
                format!("There was an error creating the {resource}. Check the details:")
            }
            Self::Polling { .. } => {
                "There was an error getting the operation. Check the details:".to_string()
            }
            Self::Timeout { .. } => {
                "The operation did not complete in time. Check the details:".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gax::error::rpc::Status;
    use gax::polling_error_policy::Exhausted;
    use test_case::test_case;

    fn service_error(message: &str) -> Error {
        Error::service(
            Status::default()
                .set_code(409)
                .set_message(message)
                .set_status("ALREADY_EXISTS"),
        )
    }

    #[test]
    fn reason_from_status() {
        let err = StepError::Creation {
            resource: Resource::Model,
            source: service_error("A model with the same name already exists."),
        };
        assert_eq!(err.reason(), "A model with the same name already exists.");
    }

    #[test]
    fn reason_from_payload() {
        let err = StepError::Creation {
            resource: Resource::Version,
            source: Error::http(
                502,
                http::HeaderMap::new(),
                bytes::Bytes::from_static(b"bad gateway"),
            ),
        };
        assert_eq!(err.reason(), "bad gateway");
    }

    #[test]
    fn reason_from_description() {
        let err = StepError::polling("op-1", Error::io("connection reset"));
        assert!(matches!(err, StepError::Polling { .. }), "{err:?}");
        assert!(err.reason().contains("connection reset"), "{}", err.reason());
    }

    #[test]
    fn polling_exhausted() {
        let source = Error::exhausted(Exhausted::new(
            "op-1",
            "attempt count",
            "3".to_string(),
            "3".to_string(),
        ));
        let err = StepError::polling("op-1", source);
        assert!(
            matches!(&err, StepError::Timeout { operation, .. } if operation == "op-1"),
            "{err:?}"
        );
    }

    #[test_case(StepError::Creation { resource: Resource::Model, source: service_error("uh-oh") }, "There was an error creating the model. Check the details:")]
    #[test_case(StepError::Creation { resource: Resource::Version, source: service_error("uh-oh") }, "There was an error creating the version. Check the details:")]
    #[test_case(StepError::polling("op-1", service_error("uh-oh")), "There was an error getting the operation. Check the details:")]
    fn headline(err: StepError, want: &str) {
        assert_eq!(err.headline(), want);
        assert!(err.to_string().contains("uh-oh"), "{err}");
    }
}
