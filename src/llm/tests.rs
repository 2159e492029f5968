#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::llm::ollama::OllamaProvider;
    use crate::llm::provider::LlmProvider;
    use crate::llm::types::ChatRequest;

    // Needs a local Ollama with llama3.2 and mxbai-embed-large pulled.
    #[tokio::test]
    #[ignore]
    async fn test_live_ollama_connection() {
        let provider =
            OllamaProvider::new("http://localhost:11434", Duration::from_secs(120)).unwrap();

        match provider.health_check().await {
            Ok(true) => println!("Ollama reachable"),
            Ok(false) => panic!("Ollama not reachable on localhost:11434"),
            Err(e) => panic!("Health check failed: {}", e),
        }

        match provider.generate("Ready?", "llama3.2").await {
            Ok(response) => println!("Ollama Generate Response: {}", response),
            Err(e) => println!("Ollama Generate Error: {}", e),
        }

        match provider.chat(ChatRequest::from_prompt("Hello"), "llama3.2").await {
            Ok(response) => println!("Ollama Chat Response: {}", response),
            Err(e) => println!("Ollama Chat Error: {}", e),
        }

        let vectors = provider
            .embed(&["Great pizza".to_string()], "mxbai-embed-large")
            .await
            .expect("embedding should succeed");
        assert_eq!(vectors.len(), 1);
        assert!(!vectors[0].is_empty());
    }
}
