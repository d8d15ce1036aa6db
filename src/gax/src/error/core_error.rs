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


use super::rpc::Status;
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error type for the ML Engine client and its polling helpers.
///
/// A request may fail in the service, in the transport, or before it is sent.
/// A polling loop may also give up before the operation completes. Use the
/// predicates to classify the error, and the accessors to get the service
/// [Status] or the raw HTTP response. The [source][std::error::Error::source]
/// carries any lower-level error.
///
/// # Example
/// ```
/// use mlengine_gax::error::Error;
/// # use mlengine_gax::error::rpc::Status;
/// fn describe(error: &Error) -> String {
///     if let Some(status) = error.status() {
///         return format!("rejected by the service: {}", status.message);
///     }
///     if error.is_exhausted() {
///         return "still running, stopped waiting".to_string();
///     }
///     format!("could not reach the service: {error}")
/// }
/// let error = Error::service(Status::default().set_code(409).set_message("already exists"));
/// assert_eq!(describe(&error), "rejected by the service: already exists");
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    fn new<T: Into<BoxError>>(kind: ErrorKind, source: T) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    /// The service rejected the request, or an operation completed with an
    /// error.
    ///
    /// # Example
    /// ```
    /// use mlengine_gax::error::Error;
    /// use mlengine_gax::error::rpc::Status;
    /// let status = Status::default().set_code(429).set_message("quota exceeded");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        Self {
            kind: ErrorKind::Service {
                status: Box::new(status),
                response: None,
            },
            source: None,
        }
    }

    /// Like [service()][Error::service], keeping the HTTP status code and
    /// headers of the response that carried `status`.
    pub fn service_with_http_metadata(
        status: Status,
        status_code: Option<u16>,
        headers: Option<HeaderMap>,
    ) -> Self {
        let response = status_code.map(|code| {
            Box::new(HttpResponse {
                status_code: code,
                headers: headers.unwrap_or_default(),
                payload: None,
            })
        });
        Self {
            kind: ErrorKind::Service {
                status: Box::new(status),
                response,
            },
            source: None,
        }
    }

    /// The error details reported by the service.
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service { status, .. } => Some(status.as_ref()),
            _ => None,
        }
    }

    /// The request did not complete before its deadline.
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Timeout, source)
    }

    /// Returns true for requests that did not complete before their deadline.
    ///
    /// The request may or may not have reached the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// The polling loop reached its attempt or time limit.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use mlengine_gax::error::Error;
    /// let error = Error::exhausted("too many polling attempts");
    /// assert!(error.is_exhausted());
    /// assert!(error.source().is_some());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Exhausted, source)
    }

    /// Returns true if the client stopped polling a running operation.
    ///
    /// The operation is not cancelled. It continues in the service and may
    /// still succeed or fail. An operation that completed with an error is
    /// reported through [status()][Error::status] instead.
    ///
    /// # Troubleshooting
    ///
    /// Deploying a model version can take several minutes. Raise the polling
    /// limits, or query the operation later using its name.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// The response could not be parsed.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Deserialization, source)
    }

    /// Returns true if the response could not be parsed.
    ///
    /// Usually the response came from something other than the service, such
    /// as a proxy.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// The request could not be encoded.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Serialization, source)
    }

    /// Returns true if the request could not be encoded. These requests never
    /// leave the client.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// A required path parameter is empty.
    pub fn binding<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Binding, source)
    }

    /// Returns true if a required path parameter is empty.
    ///
    /// # Troubleshooting
    ///
    /// Set the field named in the error, for example, the parent of a new
    /// model or the name of an operation.
    pub fn is_binding(&self) -> bool {
        matches!(self.kind, ErrorKind::Binding)
    }

    /// The credentials could not produce the authentication headers.
    pub fn authentication<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Authentication, source)
    }

    /// Returns true if the credentials could not produce the authentication
    /// headers.
    ///
    /// # Troubleshooting
    ///
    /// Point `GOOGLE_APPLICATION_CREDENTIALS` at a service account key file,
    /// or run `gcloud auth application-default login`.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// A HTTP error whose payload is not a service [Status].
    pub fn http(status_code: u16, headers: HeaderMap, payload: bytes::Bytes) -> Self {
        let response = HttpResponse {
            status_code,
            headers,
            payload: Some(payload),
        };
        Self {
            kind: ErrorKind::Http(Box::new(response)),
            source: None,
        }
    }

    /// The request failed before a HTTP response was received.
    ///
    /// For example, the connection was refused or dropped.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Io, source)
    }

    /// Returns true if no HTTP response was received.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Returns true for [io][Error::is_io] errors and for HTTP errors without
    /// a service [Status].
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Io | ErrorKind::Http(_))
    }

    fn response(&self) -> Option<&HttpResponse> {
        match &self.kind {
            ErrorKind::Http(r) => Some(r),
            ErrorKind::Service { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status code of the failed response.
    pub fn http_status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status_code)
    }

    /// The HTTP headers of the failed response.
    pub fn http_headers(&self) -> Option<&HeaderMap> {
        self.response().map(|r| &r.headers)
    }

    /// The body of a failed HTTP response that is not a service [Status].
    ///
    /// Typically set for errors generated by a proxy or load balancer.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        self.response().and_then(|r| r.payload.as_ref())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match &self.kind {
            ErrorKind::Service { status, .. } => {
                return write!(
                    f,
                    "the service reports an error with code {}: {}",
                    status.code, status.message
                );
            }
            ErrorKind::Http(response) => return response.fmt(f),
            ErrorKind::Binding => "missing required path parameter",
            ErrorKind::Serialization => "cannot serialize the request",
            ErrorKind::Deserialization => "cannot deserialize the response",
            ErrorKind::Authentication => "cannot create the authentication headers",
            ErrorKind::Timeout => "the request exceeded its deadline",
            ErrorKind::Io => "the transport reports an error",
            ErrorKind::Exhausted => "polling stopped",
        };
        match &self.source {
            Some(source) => write!(f, "{prefix}: {source}"),
            None => f.write_str(prefix),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

#[derive(Debug)]
enum ErrorKind {
    Service {
        status: Box<Status>,
        response: Option<Box<HttpResponse>>,
    },
    Http(Box<HttpResponse>),
    Io,
    Binding,
    Serialization,
    Deserialization,
    Authentication,
    Timeout,
    Exhausted,
}

#[derive(Debug)]
struct HttpResponse {
    status_code: u16,
    headers: HeaderMap,
    payload: Option<bytes::Bytes>,
}

impl std::fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.status_code;
        match self.payload.as_deref().map(std::str::from_utf8) {
            Some(Ok(text)) => write!(f, "the HTTP transport reports a [{code}] error: {text}"),
            Some(Err(_)) | None => write!(
                f,
                "the HTTP transport reports a [{code}] error: {:?}",
                self.payload
            ),
        }
    }
}
