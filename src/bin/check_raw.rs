use colored::*;
use serde_json::{json, Value};
use std::env;

fn program_name(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("check-raw")
}

/// Send one question to the backend and dump the raw exchange.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <question> [session_id]", program_name(&args));
        std::process::exit(1);
    }

    let question = &args[1];
    let session_id = args.get(2).cloned();

    let api_base = env::var("IKMS_API_BASE")
        .unwrap_or_else(|_| ikms_chat::config::DEFAULT_API_BASE.to_string());
    let url = format!("{}/qa/conversation", api_base.trim_end_matches('/'));

    println!("{}", format!("Endpoint: {}", url).green());
    println!("{}", format!("Question: {}", question).cyan());
    println!(
        "{}",
        format!("Session: {}", session_id.as_deref().unwrap_or("(new)")).yellow()
    );
    println!("{}", "-".repeat(80).dimmed());

    let request_body = json!({
        "question": question,
        "session_id": session_id,
    });

    println!("{}", "Request payload:".bold());
    println!("{}", serde_json::to_string_pretty(&request_body)?);
    println!("{}", "-".repeat(80).dimmed());

    let response = reqwest::Client::new()
        .post(&url)
        .json(&request_body)
        .send()
        .await?;

    let status = response.status();
    let status_line = format!("Status: {}", status);
    if status.is_success() {
        println!("{}", status_line.green());
    } else {
        println!("{}", status_line.red());
    }

    for (name, value) in response.headers() {
        println!(
            "{}",
            format!("{}: {}", name, value.to_str().unwrap_or("<binary>")).dimmed()
        );
    }
    println!("{}", "-".repeat(80).dimmed());

    let body = response.text().await?;
    match serde_json::from_str::<Value>(&body) {
        Ok(parsed) => println!("{}", serde_json::to_string_pretty(&parsed)?),
        Err(_) => println!("{}", body),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_name_falls_back_when_argv_is_empty() {
        assert_eq!(program_name(&[]), "check-raw");
        assert_eq!(program_name(&["/usr/bin/check-raw".to_string()]), "/usr/bin/check-raw");
    }
}
