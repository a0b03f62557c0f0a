//! Prompt templates with named `{placeholder}` inputs.
//!
//! A template declares its input variables up front; every placeholder in
//! the text must be declared and every declared input must be supplied when
//! rendering, no more and no less. `{{` and `}}` render literal braces.

use std::collections::BTreeSet;

use crate::error::PromptError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Input(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    input_variables: Vec<String>,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new<I, S>(input_variables: I, template: &str) -> Result<Self, PromptError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let input_variables: Vec<String> = input_variables.into_iter().map(Into::into).collect();
        let segments = parse(template)?;

        let declared: BTreeSet<&str> = input_variables.iter().map(String::as_str).collect();
        let found: BTreeSet<&str> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Input(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect();
        if declared != found || declared.len() != input_variables.len() {
            return Err(PromptError::InputMismatch {
                declared: input_variables.clone(),
                found: found.into_iter().map(str::to_string).collect(),
            });
        }

        Ok(Self {
            input_variables,
            segments,
        })
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Check that the template takes exactly `names` as inputs.
    pub fn expect_inputs(&self, names: &[&str]) -> Result<(), PromptError> {
        let expected: BTreeSet<&str> = names.iter().copied().collect();
        let declared: BTreeSet<&str> = self.input_variables.iter().map(String::as_str).collect();
        if expected == declared {
            Ok(())
        } else {
            Err(PromptError::InputMismatch {
                declared: self.input_variables.clone(),
                found: names.iter().map(|n| n.to_string()).collect(),
            })
        }
    }

    pub fn render(&self, inputs: &[(&str, &str)]) -> Result<String, PromptError> {
        for (name, _) in inputs {
            if !self.input_variables.iter().any(|v| v == name) {
                return Err(PromptError::UnexpectedInput((*name).to_string()));
            }
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Input(name) => {
                    let value = inputs
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| PromptError::MissingInput(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn parse(template: &str) -> Result<Vec<Segment>, PromptError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, ch)) if ch.is_alphanumeric() || ch == '_' => name.push(ch),
                        _ => {
                            return Err(PromptError::Malformed {
                                position: pos,
                                reason: "unterminated or invalid placeholder".to_string(),
                            })
                        }
                    }
                }
                if name.is_empty() {
                    return Err(PromptError::Malformed {
                        position: pos,
                        reason: "empty placeholder".to_string(),
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Input(name));
            }
            '}' => {
                return Err(PromptError::Malformed {
                    position: pos,
                    reason: "unmatched '}'".to_string(),
                })
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

// ── Built-in Prompts ─────────────────────────────────────────────

const CYPHER_TEMPLATE: &str = "Eres un experto en café de especialidad y Cypher para Neo4j.
Usa EXCLUSIVAMENTE las etiquetas y relaciones que aparezcan en el esquema provisto.

ESQUEMA DEL GRAFO:
{schema}

INSTRUCCIONES:
- Genera SOLO la consulta Cypher, sin explicación adicional.
- Evita inventar etiquetas/relaciones/propiedades que no estén en el esquema.
- Si la pregunta no aplica al grafo, produce una consulta vacía (MATCH LIMIT 0) y luego lo reportará el QA.

PREGUNTA:
{question}

Cypher:";

const QA_TEMPLATE: &str = "Eres un asistente de café de especialidad.
Usa el CONTEXTO recuperado del grafo para responder en español de forma breve, clara y útil.

PREGUNTA:
{question}

CONTEXTO (resultados del grafo):
{context}

RESPUESTA:";

/// Prompt that turns a question into one Cypher statement.
///
/// Inputs: `schema`, `question`.
pub fn cypher_prompt() -> PromptTemplate {
    PromptTemplate {
        input_variables: vec!["schema".to_string(), "question".to_string()],
        segments: parse(CYPHER_TEMPLATE).expect("built-in Cypher template is well formed"),
    }
}

/// Prompt that phrases graph rows as a natural-language answer.
///
/// Inputs: `context`, `question`.
pub fn qa_prompt() -> PromptTemplate {
    PromptTemplate {
        input_variables: vec!["context".to_string(), "question".to_string()],
        segments: parse(QA_TEMPLATE).expect("built-in QA template is well formed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_prompts_are_well_formed() {
        let cypher = PromptTemplate::new(["schema", "question"], CYPHER_TEMPLATE).unwrap();
        assert_eq!(cypher, cypher_prompt());
        let qa = PromptTemplate::new(["context", "question"], QA_TEMPLATE).unwrap();
        assert_eq!(qa, qa_prompt());
    }

    #[test]
    fn builtin_prompts_are_not_empty() {
        for prompt in [cypher_prompt(), qa_prompt()] {
            assert!(prompt.segments.len() > 1);
            let inputs: Vec<(&str, &str)> = prompt
                .input_variables()
                .iter()
                .map(|name| (name.as_str(), "x"))
                .collect();
            assert!(prompt.render(&inputs).unwrap().len() > 100);
        }
    }

    #[test]
    fn cypher_prompt_embeds_schema_and_question() {
        let schema = "(:Cafe)-[:TIENE_ORIGEN]->(:Origen)";
        let question = "¿qué orígenes hay?";
        let text = cypher_prompt()
            .render(&[("schema", schema), ("question", question)])
            .unwrap();
        assert!(text.contains(schema));
        assert!(text.contains(question));
        assert!(text.ends_with("Cypher:"));
        assert!(!text.contains("{schema}"));
    }

    #[test]
    fn qa_prompt_embeds_context_and_question() {
        let text = qa_prompt()
            .render(&[("context", r#"[{"o.nombre":"Huila"}]"#), ("question", "¿qué orígenes hay?")])
            .unwrap();
        assert!(text.contains(r#"[{"o.nombre":"Huila"}]"#));
        assert!(text.contains("¿qué orígenes hay?"));
        assert!(text.ends_with("RESPUESTA:"));
    }

    #[test]
    fn render_requires_every_input() {
        let err = cypher_prompt().render(&[("question", "hola")]).unwrap_err();
        assert_eq!(err, PromptError::MissingInput("schema".to_string()));
    }

    #[test]
    fn render_rejects_extra_inputs() {
        let err = qa_prompt()
            .render(&[("context", "[]"), ("question", "hola"), ("schema", "x")])
            .unwrap_err();
        assert_eq!(err, PromptError::UnexpectedInput("schema".to_string()));
    }

    #[test]
    fn values_with_braces_are_not_reinterpreted() {
        let tpl = PromptTemplate::new(["context"], "ctx: {context}").unwrap();
        let text = tpl.render(&[("context", "{question}")]).unwrap();
        assert_eq!(text, "ctx: {question}");
    }

    #[test]
    fn escaped_braces_render_literally() {
        let tpl = PromptTemplate::new(["name"], "MATCH (n {{name: '{name}'}})").unwrap();
        let text = tpl.render(&[("name", "Geisha")]).unwrap();
        assert_eq!(text, "MATCH (n {name: 'Geisha'})");
    }

    #[test]
    fn undeclared_placeholder_is_rejected() {
        let err = PromptTemplate::new(["question"], "{schema} {question}").unwrap_err();
        assert!(matches!(err, PromptError::InputMismatch { .. }));
    }

    #[test]
    fn unused_declared_input_is_rejected() {
        let err = PromptTemplate::new(["schema", "question"], "{question}").unwrap_err();
        assert!(matches!(err, PromptError::InputMismatch { .. }));
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert!(matches!(
            PromptTemplate::new(["a"], "{a").unwrap_err(),
            PromptError::Malformed { .. }
        ));
        assert!(matches!(
            PromptTemplate::new(Vec::<String>::new(), "a }").unwrap_err(),
            PromptError::Malformed { .. }
        ));
        assert!(matches!(
            PromptTemplate::new(Vec::<String>::new(), "{}").unwrap_err(),
            PromptError::Malformed { .. }
        ));
    }

    #[test]
    fn expect_inputs_checks_names() {
        assert!(cypher_prompt().expect_inputs(&["question", "schema"]).is_ok());
        assert!(cypher_prompt().expect_inputs(&["context", "question"]).is_err());
    }
}
