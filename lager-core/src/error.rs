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

//! Error type shared by the encoder, the decoder and the typed object layer.
//!
//! Error constructors are marked `#[cold]` and `#[track_caller]` so the
//! happy paths of the codec stay lean; build with `LAGER_PANIC_ON_ERROR=1`
//! to panic at the exact construction site of an error instead.

use std::borrow::Cow;
use std::fmt::Display;

use thiserror::Error;

/// Set `LAGER_PANIC_ON_ERROR` at compile time to panic where errors are created.
pub const PANIC_ON_ERROR: bool = option_env!("LAGER_PANIC_ON_ERROR").is_some();

/// Check if `LAGER_PANIC_ON_ERROR` was set at compile time.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for lager encoding and decoding.
///
/// Construct errors through the static functions ([`Error::unsupported_type`],
/// [`Error::dangling_pointer`], ...) rather than the variants, so that the
/// `LAGER_PANIC_ON_ERROR` debugging switch applies everywhere.
///
/// ```rust
/// use lager_core::error::Error;
///
/// let err = Error::unknown_type_id(7);
/// assert_eq!(err.to_string(), "Encountered unknown type id 7");
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A kind with no wire representation (array, channel, function).
    #[error("Can't encode or decode {0} types")]
    UnsupportedType(Cow<'static, str>),

    /// A struct/interface id in a type tag that the stream's type table never declared.
    #[error("Encountered unknown type id {0}")]
    UnknownTypeId(u64),

    /// A type name that the registry has never seen.
    #[error("Encountered unknown type name {0}; register this type before decoding")]
    UnregisteredTypeName(String),

    /// An origin key with no corresponding pointer pool entry.
    #[error("Missing pointer in pool: origin key {0}")]
    DanglingPointer(u64),

    /// A struct value naming a field its registered shape doesn't export.
    #[error("Missing field {field} in struct {type_name}")]
    UnknownField { type_name: String, field: String },

    /// `read` was called after every declared root object was consumed.
    #[error("End of stream reached, no more objects to return")]
    EndOfStream,

    /// A value whose shape disagrees with the static type of its slot.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Corrupted or malformed stream content.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// Value nesting went past the configured maximum depth.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// Operation not allowed in the current state.
    #[error("{0}")]
    NotAllowed(Cow<'static, str>),

    /// Failure of the underlying byte source or sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new [`Error::UnsupportedType`] naming the offending type.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unsupported_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::UnsupportedType(s.into());
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnknownTypeId`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_type_id(id: u64) -> Self {
        let err = Error::UnknownTypeId(id);
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnregisteredTypeName`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unregistered_type_name<S: Into<String>>(name: S) -> Self {
        let err = Error::UnregisteredTypeName(name.into());
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DanglingPointer`] for the given origin key.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn dangling_pointer(origin_key: u64) -> Self {
        let err = Error::DanglingPointer(origin_key);
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnknownField`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_field<T: Into<String>, F: Into<String>>(type_name: T, field: F) -> Self {
        let err = Error::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        };
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::EndOfStream`].
    ///
    /// This is an expected control signal and never panics, even with
    /// `LAGER_PANIC_ON_ERROR` set.
    #[inline(always)]
    pub fn end_of_stream() -> Self {
        Error::EndOfStream
    }

    /// Creates a new [`Error::TypeMismatch`].
    ///
    /// ```rust
    /// use lager_core::error::Error;
    /// use lager_core::meta::TypeDescriptor;
    ///
    /// let err = Error::type_mismatch(TypeDescriptor::Int32, "string");
    /// assert_eq!(err.to_string(), "Type mismatch: expected int32, found string");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<E: Display, F: Display>(expected: E, found: F) -> Self {
        let err = Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        };
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidData`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidData(s.into());
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::NotAllowed`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_allowed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::NotAllowed(s.into());
        if PANIC_ON_ERROR {
            panic!("LAGER_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Returns true for the [`Error::EndOfStream`] control signal.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// # Examples
/// ```
/// use lager_core::ensure;
/// use lager_core::error::Error;
///
/// fn check_len(n: i64) -> Result<(), Error> {
///     ensure!(n >= 0, "negative length {}", n);
///     ensure!(n < 10, Error::invalid_data("too long"));
///     Ok(())
/// }
/// assert!(check_len(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::InvalidData`].
///
/// # Examples
/// ```
/// use lager_core::bail;
/// use lager_core::error::Error;
///
/// fn corrupt(tag: u8) -> Result<(), Error> {
///     bail!("unknown kind tag {}", tag);
/// }
/// assert!(corrupt(99).is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::invalid_data($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)))
    };
}
