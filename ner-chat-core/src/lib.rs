//! # ner-chat-core — NER com modelo pré-treinado e agregação de spans BIO
//!
//! Núcleo do chatbot de Reconhecimento de Entidades Nomeadas: recebe texto
//! livre, rotula cada token WordPiece com um modelo BERT de classificação de
//! tokens e reconstrói entidades legíveis a partir da sequência BIO.
//!
//! ## Arquitetura
//!
//! O dado flui em linha reta, etapa por etapa:
//!
//! 1. **Entrada**: texto bruto (String).
//! 2. **Rotulagem** ([`provider`] / [`bert`]): o texto vira uma sequência
//!    alinhada de pares (token, rótulo BIO) — tokenização e inferência são do
//!    colaborador externo, atrás do trait [`LabelProvider`].
//! 3. **Agregação** ([`aggregator`]): a sequência BIO vira uma lista de
//!    [`Entity`], juntando runs contíguos do mesmo tipo e removendo os
//!    marcadores `##` de sub-palavra. Este é o único passo com lógica
//!    própria do sistema.
//! 4. **Saída**: entidades na ordem em que aparecem no texto.
//!
//! ## Exemplo de Uso
//!
//! ```rust,no_run
//! use ner_chat_core::NerPipeline;
//!
//! // Carrega modelo e tokenizador uma única vez
//! let pipeline = NerPipeline::load()?;
//!
//! let entities = pipeline.analyze("Hugging Face is based in New York City.")?;
//! for entity in entities {
//!     println!(" - {} ({})", entity.text, entity.entity_type);
//! }
//! # Ok::<(), ner_chat_core::NerError>(())
//! ```

pub mod aggregator;
pub mod bert;
pub mod error;
pub mod pipeline;
pub mod provider;

pub use aggregator::{aggregate, Entity, LabeledToken, CONTINUATION_MARKER};
pub use bert::{BertLabelProvider, DEFAULT_MODEL_ID};
pub use error::NerError;
pub use pipeline::NerPipeline;
pub use provider::LabelProvider;
