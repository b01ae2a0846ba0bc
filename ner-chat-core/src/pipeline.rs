//! # Pipeline NER — contexto explícito do chatbot
//!
//! Orquestra as duas etapas do sistema: o provedor de rótulos (tokenização +
//! inferência, colaborador externo) e o agregador de spans BIO (o núcleo
//! deste crate).
//!
//! Em vez de modelo/tokenizador globais de processo, o estado carregado vive
//! neste objeto, construído **uma vez** na inicialização e passado por
//! referência para o laço interativo. Todas as chamadas usam `&self`: não há
//! estado mutável entre análises, e sequências idênticas de (token, rótulo)
//! produzem sempre a mesma saída.

use tracing::debug;

use crate::aggregator::{aggregate, Entity};
use crate::bert::{BertLabelProvider, DEFAULT_MODEL_ID};
use crate::error::NerError;
use crate::provider::LabelProvider;

/// O pipeline NER principal: provedor de rótulos + agregação.
pub struct NerPipeline {
    provider: Box<dyn LabelProvider>,
}

impl NerPipeline {
    /// Carrega o pipeline com o provedor BERT padrão
    /// ([`DEFAULT_MODEL_ID`]). Bloqueante: baixa e materializa o checkpoint.
    pub fn load() -> Result<Self, NerError> {
        let provider = BertLabelProvider::from_pretrained(DEFAULT_MODEL_ID)?;
        Ok(Self::with_provider(Box::new(provider)))
    }

    /// Monta o pipeline sobre um provedor arbitrário (testes, outros modelos).
    pub fn with_provider(provider: Box<dyn LabelProvider>) -> Self {
        Self { provider }
    }

    /// Analisa um texto: rotula os tokens e agrega os spans BIO em entidades,
    /// na ordem de primeira aparição de cada run.
    pub fn analyze(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let labeled = self.provider.label_tokens(text)?;
        debug!(tokens = labeled.len(), "tokens rotulados pelo provedor");
        Ok(aggregate(&labeled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::LabeledToken;

    /// Provedor determinístico: devolve sempre a mesma sequência rotulada,
    /// independente do texto.
    struct FixedProvider(Vec<LabeledToken>);

    impl LabelProvider for FixedProvider {
        fn label_tokens(&self, _text: &str) -> Result<Vec<LabeledToken>, NerError> {
            Ok(self.0.clone())
        }
    }

    /// Provedor que sempre falha, para exercitar o caminho de erro.
    struct FailingProvider;

    impl LabelProvider for FailingProvider {
        fn label_tokens(&self, _text: &str) -> Result<Vec<LabeledToken>, NerError> {
            Err(NerError::Tokenizer("boom".to_string()))
        }
    }

    #[test]
    fn test_analyze_aggregates_provider_output() {
        let pipeline = NerPipeline::with_provider(Box::new(FixedProvider(vec![
            LabeledToken::new("[CLS]", "O"),
            LabeledToken::new("John", "B-PER"),
            LabeledToken::new("lives", "O"),
            LabeledToken::new("in", "O"),
            LabeledToken::new("Wash", "B-LOC"),
            LabeledToken::new("##ington", "I-LOC"),
            LabeledToken::new("[SEP]", "O"),
        ])));

        let entities = pipeline.analyze("John lives in Washington").unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "John");
        assert_eq!(entities[0].entity_type, "PER");
        assert_eq!(entities[1].text, "Washington");
        assert_eq!(entities[1].entity_type, "LOC");
    }

    #[test]
    fn test_analyze_empty_labels_yields_no_entities() {
        let pipeline = NerPipeline::with_provider(Box::new(FixedProvider(vec![])));
        assert!(pipeline.analyze("qualquer coisa").unwrap().is_empty());
    }

    #[test]
    fn test_analyze_propagates_provider_failure() {
        let pipeline = NerPipeline::with_provider(Box::new(FailingProvider));
        let err = pipeline.analyze("texto").unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let labeled = vec![
            LabeledToken::new("Hugging", "B-ORG"),
            LabeledToken::new("Face", "I-ORG"),
        ];
        let pipeline = NerPipeline::with_provider(Box::new(FixedProvider(labeled)));
        let first = pipeline.analyze("a").unwrap();
        let second = pipeline.analyze("b").unwrap();
        assert_eq!(first, second);
    }
}
