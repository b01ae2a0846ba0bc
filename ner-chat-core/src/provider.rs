//! Interface do provedor de rótulos.
//!
//! O agregador não tokeniza nem roda inferência: ele recebe a sequência
//! alinhada (token, rótulo) pronta. Este trait é a costura entre o núcleo e o
//! colaborador externo que produz essa sequência — na prática o
//! [`BertLabelProvider`](crate::bert::BertLabelProvider), e nos testes um
//! provedor de mentira com saída fixa.

use crate::aggregator::LabeledToken;
use crate::error::NerError;

/// Mapeia texto cru para a sequência ordenada de pares (token, rótulo BIO),
/// alinhados posicionalmente 1:1.
pub trait LabelProvider: Send + Sync {
    fn label_tokens(&self, text: &str) -> Result<Vec<LabeledToken>, NerError>;
}
