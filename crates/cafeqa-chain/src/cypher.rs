//! Pulling the Cypher statement out of a model completion.

/// Extract the Cypher statement from a completion.
///
/// Models often wrap the query in a fenced code block despite being told
/// not to. The first fenced block wins, minus any `cypher` language tag;
/// otherwise the whole completion is used. The result is trimmed.
pub fn extract_cypher(completion: &str) -> String {
    let trimmed = completion.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            return strip_language_tag(&after_fence[..end]).trim().to_string();
        }
    }

    strip_language_tag(trimmed).trim().to_string()
}

fn strip_language_tag(block: &str) -> &str {
    let block = block.trim_start();
    match block.get(..6) {
        Some(tag) if tag.eq_ignore_ascii_case("cypher") => {
            let rest = &block[6..];
            // Only a tag when followed by a line break or the end of the block.
            if rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n") {
                rest
            } else {
                block
            }
        }
        _ => block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_statement_is_trimmed() {
        assert_eq!(
            extract_cypher("  MATCH (o:Origen) RETURN o.nombre\n"),
            "MATCH (o:Origen) RETURN o.nombre"
        );
    }

    #[test]
    fn fenced_block_with_tag() {
        let completion = "Aquí está la consulta:\n```cypher\nMATCH (c:Cafe)-[:TIENE_ORIGEN]->(o:Origen)\nRETURN o.nombre\n```\nEspero que sirva.";
        assert_eq!(
            extract_cypher(completion),
            "MATCH (c:Cafe)-[:TIENE_ORIGEN]->(o:Origen)\nRETURN o.nombre"
        );
    }

    #[test]
    fn fenced_block_without_tag() {
        assert_eq!(
            extract_cypher("```\nMATCH (n) RETURN n LIMIT 0\n```"),
            "MATCH (n) RETURN n LIMIT 0"
        );
    }

    #[test]
    fn first_block_wins() {
        let completion = "```cypher\nMATCH (a) RETURN a\n```\n```cypher\nMATCH (b) RETURN b\n```";
        assert_eq!(extract_cypher(completion), "MATCH (a) RETURN a");
    }

    #[test]
    fn unterminated_fence_falls_back_to_whole_text() {
        assert_eq!(extract_cypher("```MATCH (n) RETURN n"), "```MATCH (n) RETURN n");
    }

    #[test]
    fn bare_language_tag_line_is_removed() {
        assert_eq!(
            extract_cypher("cypher\nMATCH (n:Metodo) RETURN n.nombre"),
            "MATCH (n:Metodo) RETURN n.nombre"
        );
    }

    #[test]
    fn identifiers_starting_with_cypher_are_kept() {
        assert_eq!(extract_cypher("cypherQuery"), "cypherQuery");
    }

    #[test]
    fn empty_completion_gives_empty_statement() {
        assert_eq!(extract_cypher("   \n"), "");
        assert_eq!(extract_cypher("```cypher\n```"), "");
    }
}
