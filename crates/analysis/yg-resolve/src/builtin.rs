//! Built-in type names

/// Every built-in type, sorted for binary search
pub const BUILTIN_TYPES: &[&str] = &[
    "binary",
    "bits",
    "boolean",
    "decimal64",
    "empty",
    "enumeration",
    "identityref",
    "instance-identifier",
    "int16",
    "int32",
    "int64",
    "int8",
    "leafref",
    "string",
    "uint16",
    "uint32",
    "uint64",
    "uint8",
    "union",
];

/// Whether `name` is a built-in type; built-ins never consult the dictionary
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(BUILTIN_TYPES.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin("string"));
        assert!(is_builtin("uint8"));
        assert!(is_builtin("instance-identifier"));
        assert!(!is_builtin("int"));
        assert!(!is_builtin("unknown"));
    }
}
