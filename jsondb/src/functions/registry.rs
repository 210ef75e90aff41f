use crate::functions::{DateFunctions, NumberFunctions, StringFunctions};

/// Bundles the string, number and date helpers.
///
/// # Examples
///
/// ```rust
/// use jsondb::functions::FunctionRegistry;
///
/// let functions = FunctionRegistry::new();
/// assert_eq!(functions.strings().to_upper("ivan"), "IVAN");
/// assert_eq!(functions.numbers().max(2.0, 3.0), 3.0);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionRegistry {
    strings: StringFunctions,
    numbers: NumberFunctions,
    dates: DateFunctions,
}

impl FunctionRegistry {
    pub fn new() -> FunctionRegistry {
        FunctionRegistry::default()
    }

    pub fn strings(&self) -> &StringFunctions {
        &self.strings
    }

    pub fn numbers(&self) -> &NumberFunctions {
        &self.numbers
    }

    pub fn dates(&self) -> &DateFunctions {
        &self.dates
    }
}
