mod error;

use error::Error;
use gamma_logic::{CardMode, Gamma, GammaConfig, GammaConfigBuilder, Section};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}, time::Duration};
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How sections are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    /// One line per section, for reading.
    Text,

    /// The sections as a JSON array, one array per input.
    Json,
}

/// Reads the pipeline options from the environment.
fn config_from_env() -> GammaConfig {
    let mut builder = GammaConfigBuilder::new();
    if let Ok(timeout) = std::env::var("GAMMA_TIMEOUT_MS") {
        match timeout.parse::<u64>() {
            Ok(ms) => builder = builder.timeout(Duration::from_millis(ms)),
            Err(err) => warn!(value = %timeout, error = %err, "ignoring invalid GAMMA_TIMEOUT_MS"),
        }
    }
    if let Ok(mode) = std::env::var("GAMMA_CARD_MODE") {
        match mode.parse::<CardMode>() {
            Ok(mode) => builder = builder.card_mode(mode),
            Err(err) => warn!(error = %err, "ignoring invalid GAMMA_CARD_MODE"),
        }
    }
    builder.build()
}

/// Writes a section on one line, followed by its variables if it has them.
fn print_section(section: &Section) {
    match section {
        Section::Input { input, .. } => println!("> {}", input),
        Section::Ambiguity { ambiguity, description } if description.is_empty() => {
            println!("  did you mean: {}", ambiguity)
        },
        Section::Ambiguity { ambiguity, description } => {
            println!("  did you mean: {} ({})", ambiguity, description)
        },
        Section::Primary { title, output, variables, .. } => {
            println!("{}: {}", title, output);
            if let Some(info) = variables {
                println!("  variables: {} (using {})", info.variables.join(", "), info.variable);
            }
        },
        Section::Basic { title, input, output } if input.is_empty() => println!("{}: {}", title, output),
        Section::Basic { title, input, output } => println!("{}: {} = {}", title, input, output),
        Section::Card(record) => match &record.output {
            Some(output) => println!("{}: {}", record.title, output),
            None => println!("{}: {}", record.title, record.input),
        },
        Section::LearnMore { title, output, .. } => {
            for link in output {
                println!("{}: {} <{}>", title, link.title, link.url);
            }
        },
        Section::Error { .. } => (),
    }
}

/// Processes one input and prints the result, reporting failures to stderr.
fn run(input: &str, gamma: &Gamma, output: Output) {
    match output {
        Output::Json => match serde_json::to_string(&gamma.eval(input)) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("error: {}", err),
        },
        Output::Text => match gamma.try_eval(input) {
            Ok(sections) => sections.iter().for_each(print_section),
            Err(err) => Error::from(err).report_to_stderr(input),
        },
    }
}

/// Processes every non-empty line of the given source.
fn run_lines(source: &str, gamma: &Gamma, output: Output) {
    source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .for_each(|line| run(line, gamma, output));
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let mut output = Output::Text;
    let mut filename = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => output = Output::Json,
            _ => filename = Some(arg),
        }
    }
    let gamma = Gamma::new(config_from_env());

    if let Some(filename) = filename {
        // run every line of a file
        match fs::read_to_string(&filename) {
            Ok(source) => run_lines(&source, &gamma, output),
            Err(err) => eprintln!("error: cannot read {}: {}", filename, err),
        }
    } else if !io::stdin().is_terminal() {
        // read input from stdin
        let mut source = String::new();
        match io::stdin().read_to_string(&mut source) {
            Ok(_) => run_lines(&source, &gamma, output),
            Err(err) => eprintln!("error: {}", err),
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("error: {}", err);
                return;
            },
        };

        fn process_line(rl: &mut DefaultEditor, gamma: &Gamma, output: Output) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            run(&input, gamma, output);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &gamma, output) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
