//! Prompt construction for the text provider.

use itertools::Itertools;

use crate::categories::CategorySet;

const TOPIC_SLOT: &str = "{TOPIC}";
const CATEGORIES_SLOT: &str = "{CATEGORIES}";

/// Instruction template sent to the text provider.
///
/// `{CATEGORIES}` is replaced with the quoted allowed-category list and
/// `{TOPIC}` with the user's topic.
const ARTICLE_TEMPLATE: &str = r#"
Write an engaging, informative article for a STEM news site aimed at ages 14-25. The topic is: "{TOPIC}". Do not end with questions or prompts for further discussion. Write in a clear, factual, and enthusiastic tone.

Start the article with a bolded, catchy hook or first sentence using <b>...</b> tags. Then continue the article with informative content. Pick the single most relevant category for the article from this list: [{CATEGORIES}] and include it as a field in the JSON response.

Respond in valid JSON with two fields:
- "category": the single most relevant category from the list above
- "content": the full article body, using the following tags for formatting (do not use markdown or asterisks):
  - <b>...</b> for bold text
  - <i>...</i> for italics
  - <u>...</u> for underline
  - <br> for new paragraphs

Example:
{"category": "Space", "content": "<b>Mars Rover Perseverance Lands in Jezero Crater.</b><br><i>It is searching for signs of life.</i>"}

Do not use any other formatting. Do not include questions at the end. Only output the JSON object.
"#;

/// Render the article instructions for `topic`.
///
/// Pure function of the template, the topic and the category set. The
/// categories are substituted first so a topic that happens to contain the
/// `{CATEGORIES}` marker is left alone.
pub fn build_prompt(topic: &str, categories: &CategorySet) -> String {
    let quoted = categories.names().map(|name| format!("\"{name}\"")).join(", ");
    ARTICLE_TEMPLATE
        .replacen(CATEGORIES_SLOT, &quoted, 1)
        .replacen(TOPIC_SLOT, topic, 1)
}
