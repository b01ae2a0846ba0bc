//! Provedor de rótulos BERT (token classification).
//!
//! Carrega um checkpoint pré-treinado de classificação de tokens do Hugging
//! Face Hub e o expõe como [`LabelProvider`]: texto entra, sai a sequência de
//! pares (token WordPiece, rótulo BIO). O encoder vem do
//! `candle-transformers`; a cabeça de classificação é uma camada linear sobre
//! o último hidden state, com os pesos `classifier.*` do próprio checkpoint.
//!
//! O modelo e o tokenizador são carregados **uma vez** na construção e vivem
//! pelo tempo do processo — não há estado mutável entre chamadas.

use std::collections::HashMap;

use candle_core::{Device, Tensor, D};
use candle_nn::ops::softmax;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use hf_hub::api::sync::Api;
use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::info;

use crate::aggregator::LabeledToken;
use crate::error::NerError;
use crate::provider::LabelProvider;

/// Checkpoint fixo usado pelo chatbot: BERT large cased, fine-tuned no
/// CoNLL-2003 inglês (rótulos PER/ORG/LOC/MISC).
pub const DEFAULT_MODEL_ID: &str = "dbmdz/bert-large-cased-finetuned-conll03-english";

/// Campos do `config.json` que interessam além da arquitetura: a dimensão da
/// cabeça linear e o mapa id -> rótulo BIO.
#[derive(Debug, Deserialize)]
struct HubConfig {
    hidden_size: usize,
    id2label: HashMap<String, String>,
}

/// Encoder BERT + cabeça linear de classificação por token.
struct BertForTokenClassification {
    bert: BertModel,
    classifier: Linear,
}

impl BertForTokenClassification {
    fn load(vb: VarBuilder, config: &BertConfig, hidden_size: usize, num_labels: usize) -> Result<Self, candle_core::Error> {
        // Checkpoints HF de token classification prefixam o encoder com "bert."
        let bert = BertModel::load(vb.pp("bert"), config)?;
        let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))?;
        Ok(Self { bert, classifier })
    }

    /// Logits por posição: shape (1, seq_len, num_labels).
    fn forward(&self, input_ids: &Tensor, token_type_ids: &Tensor) -> Result<Tensor, candle_core::Error> {
        let sequence_output = self.bert.forward(input_ids, token_type_ids, None)?;
        self.classifier.forward(&sequence_output)
    }
}

/// Provedor de rótulos baseado em BERT pré-treinado.
pub struct BertLabelProvider {
    model: BertForTokenClassification,
    tokenizer: Tokenizer,
    id2label: HashMap<String, String>,
    device: Device,
}

impl BertLabelProvider {
    /// Baixa (ou reusa do cache do hub) os arquivos do checkpoint e monta o
    /// provedor. Chamado uma única vez na inicialização do processo.
    pub fn from_pretrained(model_id: &str) -> Result<Self, NerError> {
        let device = pick_device();
        info!(model_id, device = ?device, "carregando checkpoint de token classification");

        let api = Api::new().map_err(NerError::Hub)?;
        let repo = api.model(model_id.to_string());

        let config_path = repo.get("config.json")?;
        let config_text = std::fs::read_to_string(config_path)?;
        let bert_config: BertConfig = serde_json::from_str(&config_text)?;
        let hub_config: HubConfig = serde_json::from_str(&config_text)?;

        let tokenizer_path = repo.get("tokenizer.json")?;
        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| NerError::Tokenizer(e.to_string()))?;

        // Preferência por safetensors; checkpoints antigos só têm o .bin
        let vb = match repo.get("model.safetensors") {
            Ok(path) => {
                let data = std::fs::read(path)?;
                VarBuilder::from_buffered_safetensors(data, DTYPE, &device)?
            }
            Err(_) => {
                let path = repo.get("pytorch_model.bin")?;
                VarBuilder::from_pth(&path, DTYPE, &device)?
            }
        };

        let num_labels = hub_config.id2label.len();
        let model =
            BertForTokenClassification::load(vb, &bert_config, hub_config.hidden_size, num_labels)?;
        info!(num_labels, "modelo BERT pronto");

        Ok(Self {
            model,
            tokenizer,
            id2label: hub_config.id2label,
            device,
        })
    }
}

impl LabelProvider for BertLabelProvider {
    fn label_tokens(&self, text: &str) -> Result<Vec<LabeledToken>, NerError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| NerError::Tokenizer(e.to_string()))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let logits = self.model.forward(&input_ids, &token_type_ids)?;
        let probabilities = softmax(&logits, D::Minus1)?;
        let predicted_ids = probabilities
            .argmax(D::Minus1)?
            .squeeze(0)?
            .to_vec1::<u32>()?;

        // Tokens e previsões saem alinhados 1:1 do mesmo encoding, incluindo
        // os tokens especiais [CLS]/[SEP] (rotulados "O" pelo modelo)
        let mut labeled = Vec::with_capacity(predicted_ids.len());
        for (token, id) in encoding.get_tokens().iter().zip(predicted_ids) {
            let label = self
                .id2label
                .get(&id.to_string())
                .ok_or(NerError::MissingLabel(id))?;
            labeled.push(LabeledToken::new(token.as_str(), label.as_str()));
        }
        Ok(labeled)
    }
}

/// Escolhe o acelerador disponível, caindo para CPU.
fn pick_device() -> Device {
    if candle_core::utils::cuda_is_available() {
        if let Ok(device) = Device::new_cuda(0) {
            return device;
        }
    }
    if candle_core::utils::metal_is_available() {
        if let Ok(device) = Device::new_metal(0) {
            return device;
        }
    }
    Device::Cpu
}
