use std::io::{self, BufRead, Write};

use almox_agent::runtime::SubmitError;
use almox_core::config::LoadOptions;
use almox_core::domain::chat::{Author, ChatMessage};
use anyhow::Context;
use tracing::info;

use crate::bootstrap::Application;
use crate::commands::{load_application, CommandResult, EXIT_RUNTIME};

pub const EXIT_COMMAND: &str = "/sair";

pub fn run(options: LoadOptions) -> CommandResult {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with_io(options, stdin.lock(), &mut stdout)
}

pub fn run_with_io(
    options: LoadOptions,
    input: impl BufRead,
    output: &mut impl Write,
) -> CommandResult {
    let app = match load_application("chat", options) {
        Ok(app) => app,
        Err(failure) => return failure,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime_init",
                format!("failed to initialize tokio runtime: {error}"),
                EXIT_RUNTIME,
            )
        }
    };

    match runtime.block_on(converse(&app, input, output)) {
        Ok((session_id, questions)) => CommandResult::success(
            "chat",
            format!("chat session {session_id} ended after {questions} question(s)"),
        ),
        Err(error) => CommandResult::failure("chat", "io", format!("{error:#}"), EXIT_RUNTIME),
    }
}

async fn converse(
    app: &Application,
    input: impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<(String, usize)> {
    let mut session = app.new_session();
    for message in session.transcript() {
        print_message(output, &message)?;
    }

    let mut questions = 0;
    for line in input.lines() {
        let line = line.context("failed to read chat input")?;
        if line.trim() == EXIT_COMMAND {
            break;
        }

        match session.submit(&line) {
            Ok(_) => {}
            Err(SubmitError::Rejected { user_message, .. }) => {
                writeln!(output, "! {user_message}")?;
                continue;
            }
            Err(SubmitError::ReplyPending) => {
                writeln!(output, "! Aguarde a resposta anterior.")?;
                continue;
            }
        }
        questions += 1;

        if let Some(message) = session.transcript().last() {
            print_message(output, message)?;
        }
        writeln!(output, "Assistente está digitando...")?;
        output.flush().context("failed to flush chat output")?;

        if let Some(reply) = session.next_reply().await {
            print_message(output, &reply)?;
        }
    }

    session.close();
    info!(
        event_name = "assistant.session.ended",
        session_id = session.session_id(),
        questions,
        "chat session ended"
    );
    Ok((session.session_id().to_string(), questions))
}

fn print_message(output: &mut impl Write, message: &ChatMessage) -> anyhow::Result<()> {
    let author = match message.author {
        Author::User => "Você",
        Author::Assistant => "Assistente",
    };
    writeln!(output, "[{}] {author}: {}", message.created_at.format("%H:%M:%S"), message.text)?;
    Ok(())
}
