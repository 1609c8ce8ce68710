#![no_std]

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// Declares a fieldless enum with an explicit representation and adds
/// `MAX_PRIMITIVE` (the largest discriminant) and `COUNT` constants to it.
#[macro_export]
macro_rules! enum_with_max {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ty {
            $(
                $(#[$vmeta:meta])*
                $variant:ident $(= $value:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr($repr)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant $(= $value)?,
            )*
        }

        impl $name {
            pub const MAX_PRIMITIVE: $repr = {
                let mut max = 0 as $repr;
                $(
                    let val = $name::$variant as $repr;
                    if val > max { max = val; }
                )*
                max
            };

            pub const COUNT: $repr = {
                let mut count = 0 as $repr;
                $(
                    let _ = $name::$variant as $repr;
                    count += 1;
                )*
                count
            };
        }
    };
}

enum_with_max! {
    #[derive(IntoPrimitive, TryFromPrimitive, Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum IOError : u64 {
        #[error("Not found")]
        NotFound = 1,
        #[error("Not a directory")]
        NotADirectory,
        #[error("Is a directory")]
        IsADirectory,
        #[error("Not a regular file")]
        NotARegularFile,
        #[error("Not a symbolic link")]
        NotASymlink,
        #[error("No space left on device")]
        NoSpace,
        #[error("Invalid argument")]
        InvalidArgument,
        #[error("Too many levels of symbolic links")]
        SymlinkLoop,
        #[error("Already exists")]
        AlreadyExists,
        #[error("Directory not empty")]
        DirectoryNotEmpty,
        #[error("Resource busy")]
        Busy,
        #[error("Corrupted filesystem")]
        Corrupted,
        #[error("Disk failure")]
        DiskFailure,
        #[error("Protocol error")]
        Protocol,
    }
}

pub type IOResult<T> = Result<T, IOError>;

impl IOError {
    /// Errors after which the server cannot keep serving requests.
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::DiskFailure)
    }

    /// Encodes the error as the negative result code carried in replies.
    pub fn to_result_code(self) -> i64 {
        -(u64::from(self) as i64)
    }

    /// Decodes a reply result code. Non-negative codes are successes.
    pub fn from_result_code(code: i64) -> Option<Self> {
        if code >= 0 {
            return None;
        }
        Self::try_from(code.unsigned_abs()).ok()
    }
}
