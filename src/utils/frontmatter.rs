//! # Frontmatter Helpers
//!
//! Line-oriented parsing primitives shared by the dungeon and quest-template
//! loaders. The file format is deliberately small: a `---`-fenced block of
//! `key: value` pairs, bracketed lists, and `x,y` coordinate pairs.

/// Splits a document into its frontmatter block and the remaining body.
///
/// The frontmatter is fenced by `---` lines at the very top of the document
/// (leading blank lines tolerated). Returns `None` when no complete fence
/// pair is present.
///
/// # Examples
///
/// ```
/// use questforge::utils::split_frontmatter;
///
/// let (head, body) = split_frontmatter("---\nname: X\n---\nbody").unwrap();
/// assert_eq!(head.trim(), "name: X");
/// assert_eq!(body.trim(), "body");
/// ```
pub fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_start_matches(['\n', '\r']);
    let rest = trimmed.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest.strip_prefix('\n')?;

    // Closing fence must sit on its own line.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let head = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((head, body));
        }
        offset += line.len();
    }
    None
}

/// Parses a block of `key: value` lines into pairs, preserving order.
///
/// Blank lines and lines without a colon are skipped; keys and values are
/// trimmed. Later duplicates are kept so callers can decide a policy.
pub fn parse_kv_block(block: &str) -> Vec<(String, String)> {
    block
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (key, value) = line.split_once(':')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parses a `[a, b, c]` bracketed list into trimmed items.
///
/// A bare comma-separated value without brackets is accepted too. Empty
/// items are dropped.
pub fn parse_bracketed_list(value: &str) -> Vec<String> {
    let inner = value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    inner
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parses an `x,y` coordinate pair.
pub fn parse_coord(s: &str) -> Option<(i32, i32)> {
    let (x, y) = s.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Lowercases a display name into a stable id slug.
///
/// Runs of non-alphanumeric characters collapse into single underscores.
///
/// # Examples
///
/// ```
/// use questforge::utils::slugify;
///
/// assert_eq!(slugify("Goblin Cave"), "goblin_cave");
/// assert_eq!(slugify("  Water the  plants! "), "water_the_plants");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    slug.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter_basic() {
        let text = "---\nname: Cave\ndifficulty: easy\n---\n\n## entry\n";
        let (head, body) = split_frontmatter(text).unwrap();
        assert!(head.contains("name: Cave"));
        assert!(body.contains("## entry"));
    }

    #[test]
    fn test_split_frontmatter_missing_fence() {
        assert!(split_frontmatter("name: Cave\n").is_none());
        assert!(split_frontmatter("---\nname: Cave\n").is_none());
    }

    #[test]
    fn test_split_frontmatter_tolerates_leading_blank_lines() {
        let text = "\n\n---\nname: X\n---\nbody";
        let (head, _) = split_frontmatter(text).unwrap();
        assert_eq!(head.trim(), "name: X");
    }

    #[test]
    fn test_parse_kv_block() {
        let pairs = parse_kv_block("name: Cave\n\n  difficulty  :  easy\nnot a pair\n");
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "Cave".to_string()),
                ("difficulty".to_string(), "easy".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_bracketed_list() {
        assert_eq!(
            parse_bracketed_list("[weapon, trinket]"),
            vec!["weapon".to_string(), "trinket".to_string()]
        );
        assert_eq!(parse_bracketed_list("weapon"), vec!["weapon".to_string()]);
        assert!(parse_bracketed_list("[]").is_empty());
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("3,4"), Some((3, 4)));
        assert_eq!(parse_coord(" 10 , -2 "), Some((10, -2)));
        assert_eq!(parse_coord("3;4"), None);
        assert_eq!(parse_coord("a,b"), None);
    }
}
