//! Chatbot NER interativo no terminal.
//!
//! Laço de conversa mínimo: lê uma linha, roda o pipeline (rotulagem BERT +
//! agregação BIO) e imprime as entidades encontradas. O modelo é carregado
//! uma única vez na inicialização e compartilhado por `Arc` com as tarefas de
//! inferência, que rodam em `spawn_blocking` por serem síncronas.

use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context;
use ner_chat_core::{Entity, NerPipeline};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Desfecho de um turno da conversa.
///
/// O laço decide o que fazer por pattern matching neste resultado, em vez de
/// capturar exceções genéricas: interrupção e falha de pipeline são variantes
/// explícitas.
enum TurnOutcome {
    /// O usuário digitou a palavra de saída (ou o stdin acabou).
    ExitRequested,
    /// Ctrl-C durante a espera por entrada.
    InterruptRequested,
    /// Qualquer falha vinda do pipeline; encerra a sessão (sem retry).
    PipelineFailure(String),
    /// Análise concluída, possivelmente sem nenhuma entidade.
    Entities(Vec<Entity>),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    println!("Hugging Face NER Chatbot");
    println!("Type 'exit' to end the conversation.\n");

    // Carga única do checkpoint; falha aqui encerra o processo
    let pipeline = tokio::task::spawn_blocking(NerPipeline::load)
        .await?
        .context("failed to load the NER model")?;
    let pipeline = Arc::new(pipeline);
    info!("pipeline NER carregado, iniciando a conversa");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match next_turn(&pipeline, &mut lines).await {
            TurnOutcome::ExitRequested => {
                println!("Exiting the chatbot.");
                break;
            }
            TurnOutcome::InterruptRequested => {
                println!();
                println!("Exiting the chatbot.");
                break;
            }
            TurnOutcome::PipelineFailure(description) => {
                println!("An error occurred: {description}");
                break;
            }
            TurnOutcome::Entities(entities) => print_entities(&entities),
        }
    }
    Ok(())
}

/// Executa um turno: prompt, leitura de linha e análise.
///
/// A palavra de saída é comparada contra a linha inteira, sem trim, em
/// caixa-insensitiva. A inferência roda fora do runtime por ser bloqueante.
async fn next_turn(pipeline: &Arc<NerPipeline>, lines: &mut Lines<BufReader<Stdin>>) -> TurnOutcome {
    print!("You: ");
    let _ = std::io::stdout().flush();

    let line = tokio::select! {
        result = lines.next_line() => match result {
            Ok(Some(line)) => line,
            Ok(None) => return TurnOutcome::ExitRequested,
            Err(e) => return TurnOutcome::PipelineFailure(e.to_string()),
        },
        _ = tokio::signal::ctrl_c() => return TurnOutcome::InterruptRequested,
    };

    if line.eq_ignore_ascii_case("exit") {
        return TurnOutcome::ExitRequested;
    }

    let pipeline = Arc::clone(pipeline);
    match tokio::task::spawn_blocking(move || pipeline.analyze(&line)).await {
        Ok(Ok(entities)) => TurnOutcome::Entities(entities),
        Ok(Err(e)) => TurnOutcome::PipelineFailure(e.to_string()),
        Err(e) => TurnOutcome::PipelineFailure(e.to_string()),
    }
}

fn print_entities(entities: &[Entity]) {
    if entities.is_empty() {
        println!("No named entities found.");
        return;
    }
    println!("Named Entities:");
    for entity in entities {
        println!("{}", format_entity_line(entity));
    }
}

/// Uma linha por entidade: ` - <texto> (<tipo>)`.
fn format_entity_line(entity: &Entity) -> String {
    format!(" - {} ({})", entity.text, entity.entity_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entity_line() {
        let entity = Entity {
            text: "New York City".to_string(),
            entity_type: "LOC".to_string(),
        };
        assert_eq!(format_entity_line(&entity), " - New York City (LOC)");
    }

    #[test]
    fn test_exit_keyword_is_case_insensitive() {
        for word in ["exit", "Exit", "EXIT", "eXiT"] {
            assert!(word.eq_ignore_ascii_case("exit"));
        }
        // Linha inteira, sem trim: " exit" não encerra
        assert!(!" exit".eq_ignore_ascii_case("exit"));
    }
}
