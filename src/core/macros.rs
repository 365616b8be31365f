//! Macros shared by the option map types.

/// Implements the common accessors of a string-keyed JSON option map.
///
/// The target type must be a tuple struct wrapping a
/// `BTreeMap<String, serde_json::Value>`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Default)]
/// pub struct MyOptions(std::collections::BTreeMap<String, serde_json::Value>);
/// impl_option_map!(MyOptions);
/// ```
#[macro_export]
macro_rules! impl_option_map {
    ($type:ident) => {
        impl $type {
            /// Creates an empty option map.
            pub fn new() -> Self {
                Self(std::collections::BTreeMap::new())
            }

            /// Adds an option, returning the updated map.
            pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
                self.0.insert(key.into(), value.into());
                self
            }

            /// Inserts an option, returning the previous value for the key.
            pub fn insert(
                &mut self,
                key: impl Into<String>,
                value: impl Into<serde_json::Value>,
            ) -> Option<serde_json::Value> {
                self.0.insert(key.into(), value.into())
            }

            /// Removes an option, returning its value if it was present.
            pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
                self.0.remove(key)
            }

            /// Returns the raw value for a key.
            pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
                self.0.get(key)
            }

            pub fn contains_key(&self, key: &str) -> bool {
                self.0.contains_key(key)
            }

            /// Iterates over the options in key order.
            pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
                self.0.iter()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Reads a numeric option.
            ///
            /// Returns `Ok(None)` when the key is absent and a configuration
            /// error when the value is not a number.
            pub fn get_f32(&self, key: &str) -> $crate::core::errors::PiiResult<Option<f32>> {
                match self.0.get(key) {
                    None => Ok(None),
                    Some(value) => value.as_f64().map(|v| Some(v as f32)).ok_or_else(|| {
                        $crate::core::errors::PiiError::config_error_with_context(
                            key,
                            &value.to_string(),
                            "expected a number",
                        )
                    }),
                }
            }

            /// Reads a string option.
            pub fn get_str(&self, key: &str) -> $crate::core::errors::PiiResult<Option<&str>> {
                match self.0.get(key) {
                    None => Ok(None),
                    Some(value) => value.as_str().map(Some).ok_or_else(|| {
                        $crate::core::errors::PiiError::config_error_with_context(
                            key,
                            &value.to_string(),
                            "expected a string",
                        )
                    }),
                }
            }

            /// Reads a list-of-strings option.
            pub fn get_str_list(
                &self,
                key: &str,
            ) -> $crate::core::errors::PiiResult<Option<Vec<String>>> {
                let Some(value) = self.0.get(key) else {
                    return Ok(None);
                };
                let invalid = || {
                    $crate::core::errors::PiiError::config_error_with_context(
                        key,
                        &value.to_string(),
                        "expected a list of strings",
                    )
                };
                value
                    .as_array()
                    .ok_or_else(invalid)?
                    .iter()
                    .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                    .collect::<$crate::core::errors::PiiResult<Vec<_>>>()
                    .map(Some)
            }
        }

        impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for $type {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self(
                    iter.into_iter()
                        .map(|(k, v)| (k.into(), v.into()))
                        .collect(),
                )
            }
        }
    };
}
