use crate::adapters::render::{render_page, OutputFormat};
use crate::core::pagination::Paginator;
use crate::core::search::SearchService;
use crate::core::session::SearchSession;
use crate::domain::catalogue::{INDUSTRIES, STATES};
use crate::domain::ports::CompletionProvider;
use crate::utils::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const HELP: &str = "\
Commands:
  industry <name|number>  select an industry (\"industry\" alone lists them)
  state <name|number>     select a state (\"state\" alone lists them)
  search                  run the search
  next | prev             move between result pages
  page <n>                jump to a result page
  show                    show the current selection and page
  clear                   reset criteria and results
  help                    show this help
  quit                    leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Industry(Option<String>),
    State(Option<String>),
    Search,
    Next,
    Prev,
    Page(usize),
    Show,
    Clear,
    Help,
    Quit,
}

/// 解析一行輸入，失敗時回傳要顯示給使用者的訊息
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let argument = (!rest.is_empty()).then(|| rest.to_string());

    match word.to_ascii_lowercase().as_str() {
        "industry" => Ok(Command::Industry(argument)),
        "state" => Ok(Command::State(argument)),
        "search" => Ok(Command::Search),
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Prev),
        "page" => rest
            .parse()
            .map(Command::Page)
            .map_err(|_| format!("Invalid page number: '{}'", rest)),
        "show" => Ok(Command::Show),
        "clear" => Ok(Command::Clear),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err("Type 'help' for the list of commands".to_string()),
        other => Err(format!("Unknown command '{}'. Type 'help' for the list of commands", other)),
    }
}

/// A 1-based number picks from the catalogue; anything else is used as typed.
pub fn resolve_choice(input: &str, choices: &[&str]) -> String {
    match input.parse::<usize>() {
        Ok(n) if (1..=choices.len()).contains(&n) => choices[n - 1].to_string(),
        _ => input.to_string(),
    }
}

fn numbered(title: &str, choices: &[&str]) -> String {
    let mut out = format!("{}:", title);
    for (i, choice) in choices.iter().enumerate() {
        out.push_str(&format!("\n  {:>2}. {}", i + 1, choice));
    }
    out
}

fn describe(session: &SearchSession, format: OutputFormat, paginator: &Paginator) -> Result<String> {
    let mut out = String::new();
    if let Some(error) = session.error() {
        out.push_str(&format!("❌ {}\n", error));
    }
    if !session.results().is_empty() {
        out.push_str(&render_page(
            session.results(),
            paginator,
            session.current_page(),
            format,
        )?);
        out.push('\n');
    } else if session.has_searched() && session.error().is_none() {
        out.push_str("No results.\n");
    }
    Ok(out)
}

/// Runs the search form over `input`/`output` until `quit` or end of input.
pub async fn run_session<P, R, W>(
    service: &SearchService<P>,
    format: OutputFormat,
    input: R,
    mut output: W,
) -> Result<()>
where
    P: CompletionProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let paginator = Paginator::default();
    let mut session = SearchSession::new(paginator);
    let mut lines = input.lines();

    output.write_all(format!("{}\n", HELP).as_bytes()).await?;

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                output.write_all(format!("{}\n", message).as_bytes()).await?;
                continue;
            }
        };

        let reply = match command {
            Command::Industry(None) => numbered("Industries", INDUSTRIES),
            Command::Industry(Some(value)) => {
                session.set_industry(resolve_choice(&value, INDUSTRIES));
                format!("Industry: {}", session.criteria().industry)
            }
            Command::State(None) => numbered("States", STATES),
            Command::State(Some(value)) => {
                session.set_state(resolve_choice(&value, STATES));
                format!("State: {}", session.criteria().state)
            }
            Command::Search => {
                if session.has_searched() {
                    output
                        .write_all(b"Hint: use 'clear' before making a new search.\n")
                        .await?;
                }
                output.write_all(b"Searching...\n").await?;
                output.flush().await?;
                session.search(service).await;
                describe(&session, format, &paginator)?
            }
            Command::Next => {
                session.next_page();
                describe(&session, format, &paginator)?
            }
            Command::Prev => {
                session.prev_page();
                describe(&session, format, &paginator)?
            }
            Command::Page(n) => {
                session.go_to_page(n);
                describe(&session, format, &paginator)?
            }
            Command::Show => {
                let criteria = session.criteria();
                format!(
                    "Industry: {}\nState: {}\n{}",
                    display_or_unset(&criteria.industry),
                    display_or_unset(&criteria.state),
                    describe(&session, format, &paginator)?
                )
            }
            Command::Clear => {
                session.clear();
                "Cleared.".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => break,
        };

        output
            .write_all(format!("{}\n", reply.trim_end()).as_bytes())
            .await?;
    }

    output.flush().await?;
    Ok(())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not selected)"
    } else {
        value
    }
}
