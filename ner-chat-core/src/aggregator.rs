//! # Agregação de Spans BIO
//!
//! Converte a saída "token a token" do modelo (sequência alinhada de pares
//! token/rótulo no esquema **BIO**) em entidades legíveis, juntando runs
//! contíguos do mesmo tipo e removendo os marcadores de sub-palavra do
//! WordPiece.
//!
//! ## Esquema de Rótulos
//!
//! | Rótulo  | Significado                                      |
//! |---------|--------------------------------------------------|
//! | `B-TAG` | Begin — primeiro token de uma entidade           |
//! | `I-TAG` | Inside — continuação da mesma entidade           |
//! | `O`     | Outside — token fora de qualquer entidade        |
//!
//! O tipo (`PER`, `ORG`, `LOC`, `MISC`, ...) é uma string aberta: vem do
//! `id2label` do checkpoint, não de um enum fechado deste crate.
//!
//! ## Exemplo
//!
//! ```rust
//! use ner_chat_core::aggregator::{aggregate, LabeledToken};
//!
//! let labeled = vec![
//!     LabeledToken::new("Wash", "B-LOC"),
//!     LabeledToken::new("##ington", "I-LOC"),
//! ];
//! let entities = aggregate(&labeled);
//! assert_eq!(entities[0].text, "Washington");
//! assert_eq!(entities[0].entity_type, "LOC");
//! ```

use serde::{Deserialize, Serialize};

/// Prefixo que o WordPiece usa para marcar fragmentos de sub-palavra
/// (ex: "Washington" -> "Wash" + "##ington").
pub const CONTINUATION_MARKER: &str = "##";

/// Um token do texto com o rótulo BIO previsto pelo modelo.
///
/// Os pares são alinhados posicionalmente 1:1 — o i-ésimo rótulo pertence ao
/// i-ésimo token. A agregação consome a sequência em passo único, da esquerda
/// para a direita.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledToken {
    /// O texto do token, possivelmente um fragmento de sub-palavra
    /// (ex: "Lula", "##ington", "[CLS]").
    pub token: String,
    /// Rótulo BIO: "O" ou "<B|I>-<TIPO>" (ex: "B-PER", "I-LOC").
    pub label: String,
}

impl LabeledToken {
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }
}

/// Uma entidade nomeada reconstruída a partir de um run de tokens.
///
/// Registro transitório: criado durante a agregação de um texto e descartado
/// após ser exibido ao usuário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Texto da entidade já sem marcadores de continuação (ex: "New York City").
    pub text: String,
    /// Tipo da entidade como veio do rótulo (ex: "PER", "ORG", "LOC").
    pub entity_type: String,
}

/// Tipo do rótulo sem o prefixo BIO: "B-ORG" -> "ORG".
///
/// Rótulo com menos de 2 caracteres (malformado, fora do contrato) degrada
/// para string vazia em vez de panicar, o mesmo que um slice `[2:]` curto.
fn entity_type_of(label: &str) -> &str {
    label.get(2..).unwrap_or("")
}

/// Agrega a sequência alinhada (token, rótulo) em entidades.
///
/// Máquina de estados de passo único sobre a sequência:
/// - `O` fecha o run em andamento (se houver) e zera o estado;
/// - rótulo do **mesmo tipo** do run atual anexa o token — fragmento de
///   continuação (`##...`) concatena direto, token comum concatena com um
///   espaço separador;
/// - tipo **diferente** fecha o run em andamento e abre um novo.
///
/// Após o laço, o run pendente é emitido (flush) e cada texto passa por uma
/// remoção de `##` na string inteira.
///
/// Dois comportamentos herdados são preservados de propósito:
/// - runs adjacentes do mesmo tipo sem `O` entre eles são fundidos num só
///   (a fusão olha apenas a igualdade de tipo, não a fronteira `B-`);
/// - o espaço antes de token não-continuação é incondicional.
pub fn aggregate(labeled: &[LabeledToken]) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::new();
    let mut current_entity = String::new();
    let mut current_entity_type = String::new();

    for pair in labeled {
        if pair.label == "O" {
            if !current_entity.is_empty() {
                entities.push(Entity {
                    text: current_entity.clone(),
                    entity_type: current_entity_type.clone(),
                });
                current_entity.clear();
                current_entity_type.clear();
            }
            continue;
        }

        let entity_type = entity_type_of(&pair.label);
        if entity_type == current_entity_type {
            if pair.token.starts_with(CONTINUATION_MARKER) {
                current_entity.push_str(&pair.token);
            } else {
                current_entity.push(' ');
                current_entity.push_str(&pair.token);
            }
        } else {
            if !current_entity.is_empty() {
                entities.push(Entity {
                    text: current_entity.clone(),
                    entity_type: current_entity_type.clone(),
                });
            }
            current_entity = pair.token.clone();
            current_entity_type = entity_type.to_string();
        }
    }

    // Flush do run pendente no fim da sequência
    if !current_entity.is_empty() {
        entities.push(Entity {
            text: current_entity,
            entity_type: current_entity_type,
        });
    }

    for entity in &mut entities {
        entity.text = strip_continuation_markers(&entity.text);
    }
    entities
}

/// Remove o marcador `##` em qualquer posição da string (não só em fronteira
/// de token). Idempotente: aplicar sobre string já limpa é no-op.
pub fn strip_continuation_markers(text: &str) -> String {
    text.replace(CONTINUATION_MARKER, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<LabeledToken> {
        items
            .iter()
            .map(|(t, l)| LabeledToken::new(*t, *l))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_all_outside() {
        let labeled = pairs(&[("o", "O"), ("gato", "O"), ("dorme", "O")]);
        assert!(aggregate(&labeled).is_empty());
    }

    #[test]
    fn test_two_multi_token_entities() {
        let labeled = pairs(&[
            ("Hugging", "B-ORG"),
            ("Face", "I-ORG"),
            ("is", "O"),
            ("based", "O"),
            ("in", "O"),
            ("New", "B-LOC"),
            ("York", "I-LOC"),
            ("City", "I-LOC"),
            (".", "O"),
        ]);
        let entities = aggregate(&labeled);
        assert_eq!(
            entities,
            vec![
                Entity {
                    text: "Hugging Face".into(),
                    entity_type: "ORG".into()
                },
                Entity {
                    text: "New York City".into(),
                    entity_type: "LOC".into()
                },
            ]
        );
    }

    #[test]
    fn test_trailing_entity_is_flushed() {
        let labeled = pairs(&[("John", "B-PER")]);
        let entities = aggregate(&labeled);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "John");
        assert_eq!(entities[0].entity_type, "PER");
    }

    #[test]
    fn test_continuation_merges_without_space() {
        let labeled = pairs(&[("Wash", "B-LOC"), ("##ington", "I-LOC")]);
        let entities = aggregate(&labeled);
        assert_eq!(entities[0].text, "Washington");
    }

    #[test]
    fn test_continuation_inside_longer_run() {
        // "Hu" + "##gging" + "Face": o fragmento cola direto, a palavra
        // seguinte entra com espaço
        let labeled = pairs(&[
            ("Hu", "B-ORG"),
            ("##gging", "I-ORG"),
            ("Face", "I-ORG"),
        ]);
        let entities = aggregate(&labeled);
        assert_eq!(entities[0].text, "Hugging Face");
    }

    #[test]
    fn test_adjacent_runs_of_same_type_merge() {
        // Comportamento herdado: a fusão compara apenas o tipo, então dois
        // B- adjacentes do mesmo tipo viram uma entidade só. Não "corrigir".
        let labeled = pairs(&[("John", "B-PER"), ("Mary", "B-PER")]);
        let entities = aggregate(&labeled);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "John Mary");
    }

    #[test]
    fn test_type_change_without_outside_boundary() {
        let labeled = pairs(&[("Google", "B-ORG"), ("Paris", "B-LOC")]);
        let entities = aggregate(&labeled);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_type, "ORG");
        assert_eq!(entities[1].entity_type, "LOC");
    }

    #[test]
    fn test_emitted_count_bounded_by_runs() {
        // Propriedade: nº de entidades <= nº de runs maximais não-"O"
        let labeled = pairs(&[
            ("a", "B-PER"),
            ("b", "I-PER"),
            ("x", "O"),
            ("c", "B-LOC"),
            ("y", "O"),
            ("d", "B-LOC"),
            ("e", "B-LOC"),
        ]);
        let entities = aggregate(&labeled);
        assert!(entities.len() <= 3);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let clean = strip_continuation_markers("Wash##ington");
        assert_eq!(clean, "Washington");
        assert_eq!(strip_continuation_markers(&clean), clean);
    }

    #[test]
    fn test_malformed_short_label_does_not_panic() {
        // Fora do contrato, mas degrada como o slice [2:] de uma string curta
        let labeled = pairs(&[("x", "B")]);
        let entities = aggregate(&labeled);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].entity_type, "");
    }
}
