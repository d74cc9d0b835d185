/// Minimum number of characters for a record label such as a patient name or test type.
pub const MIN_LABEL_LEN: usize = 2;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text had fewer characters than required
    #[error("must be at least {min} characters")]
    TooShort { min: usize, actual: usize },
}

/// A string type that guarantees at least `MIN` characters.
///
/// Length is counted in Unicode scalar values. Unlike a trimmed text type, the input is
/// stored exactly as given, so `"  "` satisfies a minimum of two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinLengthText<const MIN: usize>(String);

/// Text used for short record labels (patient name, test type).
pub type Label = MinLengthText<MIN_LABEL_LEN>;

impl<const MIN: usize> MinLengthText<MIN> {
    /// Creates a new `MinLengthText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::TooShort)` if the input has fewer than `MIN` characters.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        let actual = input.chars().count();
        if actual < MIN {
            return Err(TextError::TooShort { min: MIN, actual });
        }
        Ok(Self(input))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const MIN: usize> std::fmt::Display for MinLengthText<MIN> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const MIN: usize> AsRef<str> for MinLengthText<MIN> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const MIN: usize> serde::Serialize for MinLengthText<MIN> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, const MIN: usize> serde::Deserialize<'de> for MinLengthText<MIN> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MinLengthText::new(s).map_err(serde::de::Error::custom)
    }
}
