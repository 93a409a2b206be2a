//! Named publisher groups and the source domains they own.

const MURDOCH_MEDIA: &[&str] = &[
  "theaustralian.com.au",
  "news.com.au",
  "heraldsun.com.au",
  "skynews.com.au",
  "dailytelegraph.com.au",
  "couriermail.com.au",
  "nypost.com",
  "wsj.com",
  "foxnews.com",
];

/// Expand a publisher alias to its source domains. Matching ignores ASCII
/// case and surrounding whitespace. Returns `None` for unknown aliases.
pub fn sources_for(publisher: &str) -> Option<&'static [&'static str]> {
  let name = publisher.trim();
  if name.eq_ignore_ascii_case("murdoch media") {
    Some(MURDOCH_MEDIA)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn murdoch_media_expands() {
    let sources = sources_for("murdoch media").unwrap();
    assert_eq!(sources.len(), 9);
    assert!(sources.contains(&"foxnews.com"));
    assert_eq!(sources_for(" Murdoch Media "), Some(sources));
  }

  #[test]
  fn unknown_alias_is_none() {
    assert!(sources_for("nine entertainment").is_none());
  }
}
