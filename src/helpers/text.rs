/// Name normalization used for both dedup and brand matching:
/// all whitespace removed, lower-cased.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
