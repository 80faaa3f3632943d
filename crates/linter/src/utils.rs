//! Utility functions for construct id rules

/// Word naming the deployable unit concept
pub const STACK_WORD: &str = "Stack";

/// Word naming the generic construct concept
pub const CONSTRUCT_WORD: &str = "Construct";

/// Check if an id is PascalCase: an uppercase ASCII letter followed only by
/// ASCII letters and digits, with at least one lowercase letter among them.
///
/// `Test`, `TestData` and `S3Bucket` pass; `TESTDATA`, `testData`,
/// `Test_Data` and `Test-Data` do not.
pub fn is_pascal_case(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_uppercase() {
        return false;
    }
    let mut has_lowercase = false;
    for c in chars {
        if !c.is_ascii_alphanumeric() {
            return false;
        }
        has_lowercase |= c.is_ascii_lowercase();
    }
    has_lowercase
}
