use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::session::QaSession;

const BANNER: &str = "\n\n====================================\n";
const PROMPT: &str = "Ask your question (q to quit): ";

/// Read questions until `q` (any case) or end of input, printing one answer
/// per question. Only I/O errors on the terminal end the loop early.
pub async fn run_repl<R, W>(session: &mut QaSession, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(BANNER.as_bytes()).await?;
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(question) = lines.next_line().await? else {
            tracing::info!("End of input, leaving");
            break;
        };
        if question.to_lowercase() == "q" {
            break;
        }

        let answer = session.answer(&question).await;
        output
            .write_all(format!("\nAnswer:\n {}\n", answer).as_bytes())
            .await?;
        output.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::llm::testing::ScriptedProvider;
    use crate::qa::session::tests::{session, CountingRetriever};

    async fn run(input: &str, session: &mut QaSession) -> String {
        let mut output: Vec<u8> = Vec::new();
        run_repl(session, input.as_bytes(), &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn uppercase_q_quits_without_answering() {
        let llm = Arc::new(ScriptedProvider::answering("unused"));
        let retriever = Arc::new(CountingRetriever::with_reviews(&["Great crust"]));
        let mut session = session(retriever.clone(), llm.clone());

        let output = run("Q\n", &mut session).await;

        assert!(output.contains("Ask your question (q to quit): "));
        assert!(!output.contains("Answer:"));
        assert_eq!(retriever.calls(), 0);
        assert_eq!(ScriptedProvider::calls(&llm.generate_calls), 0);
    }

    #[tokio::test]
    async fn answers_each_question_until_quit() {
        let llm = Arc::new(ScriptedProvider::answering("Crispy and thin."));
        let retriever = Arc::new(CountingRetriever::with_reviews(&["Great crust"]));
        let mut session = session(retriever.clone(), llm);

        let output = run("How is the crust?\nHow is the crust?\nq\n", &mut session).await;

        assert_eq!(output.matches("\nAnswer:\n Crispy and thin.\n").count(), 2);
        assert_eq!(output.matches(PROMPT).count(), 3);
        assert!(output.starts_with(BANNER));
        assert_eq!(retriever.calls(), 1);
    }

    #[tokio::test]
    async fn model_failure_is_printed_and_loop_continues() {
        let llm = Arc::new(ScriptedProvider::failing());
        let retriever = Arc::new(CountingRetriever::with_reviews(&["Great crust"]));
        let mut session = session(retriever.clone(), llm.clone());

        let output = run("First?\nSecond?\nq\n", &mut session).await;

        let answers: Vec<&str> = output.split("\nAnswer:\n ").skip(1).collect();
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.to_lowercase().contains("error")));
        assert_eq!(retriever.calls(), 2);
    }

    #[tokio::test]
    async fn end_of_input_ends_the_loop() {
        let llm = Arc::new(ScriptedProvider::answering("ok"));
        let mut session = session(
            Arc::new(CountingRetriever::with_reviews(&[])),
            llm,
        );

        let output = run("Last question", &mut session).await;

        assert_eq!(output.matches("Answer:").count(), 1);
        assert!(output.ends_with(PROMPT));
    }
}
