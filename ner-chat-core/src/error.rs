//! Erros do pipeline NER.
//!
//! O agregador em si nunca falha; tudo aqui vem das etapas externas — download
//! do checkpoint, tokenização e inferência. As mensagens de `Display` são em
//! inglês porque alimentam, palavra por palavra, a linha
//! `An error occurred: <descrição>` do chatbot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NerError {
    /// Falha ao baixar um arquivo do checkpoint no Hugging Face Hub.
    #[error("failed to fetch model file from the hub: {0}")]
    Hub(#[from] hf_hub::api::sync::ApiError),

    /// Falha ao carregar ou aplicar o tokenizador WordPiece.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Falha em operação de tensor/modelo do candle.
    #[error("model error: {0}")]
    Model(#[from] candle_core::Error),

    /// `config.json` do checkpoint ilegível ou sem os campos esperados.
    #[error("invalid model config: {0}")]
    Config(#[from] serde_json::Error),

    /// Leitura de arquivo local (pesos, config) falhou.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// O modelo previu um id de rótulo que não existe no `id2label` do
    /// checkpoint. Falha imediata, espelhando o comportamento original.
    #[error("predicted label id {0} is missing from the model's id2label map")]
    MissingLabel(u32),
}
