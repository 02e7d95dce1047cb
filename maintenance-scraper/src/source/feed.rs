use rss::{Channel, ChannelBuilder, Item};
use crate::config::Replacement;

/// True when the normalized description mentions any keyword.
/// Replacements run first so links that merely contain a keyword don't count.
fn is_relevant(description: &str, keywords: &[String], replacements: &[Replacement]) -> bool {
    let mut cleaned = description.to_lowercase();
    for replacement in replacements {
        cleaned = cleaned.replace(&replacement.from.to_lowercase(), &replacement.to);
    }

    keywords
        .iter()
        .any(|keyword| cleaned.contains(&keyword.to_lowercase()))
}

/// Parse an RSS document and re-serialize only the relevant items.
/// Kept items are unmodified; the normalization is used for matching only.
pub fn filter_feed(
    xml: &[u8],
    keywords: &[String],
    replacements: &[Replacement],
) -> Result<String, rss::Error> {
    let channel = Channel::read_from(xml)?;
    tracing::info!("found {} rss entries", channel.items().len());

    let items: Vec<Item> = channel
        .items()
        .iter()
        .filter(|item| is_relevant(item.description().unwrap_or_default(), keywords, replacements))
        .cloned()
        .collect();

    tracing::info!("found {} filtered rss entries", items.len());

    let filtered = ChannelBuilder::default()
        .title(channel.title())
        .link(channel.link())
        .description(channel.description())
        .items(items)
        .build();

    Ok(filtered.to_string())
}
