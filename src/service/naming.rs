/// Output name stem: the second `-`-separated segment of the package name
///
/// `universal-foo` gives `foo`, `rax-text-input` gives `text`.
/// Names without a separator are returned unchanged.
pub fn entry_name(package_name: &str) -> &str {
    package_name.split('-').nth(1).unwrap_or(package_name)
}

/// Global name for UMD builds: `rax-view` gives `RaxView`
pub fn upper_camel_case(package_name: &str) -> String {
    package_name
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
