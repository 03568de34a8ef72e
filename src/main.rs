mod cli;

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rewrite_rules::RuleSet;
use rewriter::{AsciiCompatibleEncoding, HtmlRewriter, OutputSink};

use cli::Cli;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Writes rewritten output through to a writer. The sink can't report
/// failures to the rewriter, so the first one is kept for the caller.
struct WriterSink<W: Write> {
    writer: W,
    error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        let mut error = self.error.borrow_mut();
        if error.is_none()
            && let Err(err) = self.writer.write_all(chunk)
        {
            *error = Some(err);
        }
    }
}

impl<W: Write> WriterSink<W> {
    fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.borrow_mut().take() {
            return Err(err);
        }
        self.writer.flush()
    }
}

fn open_input(cli: &Cli) -> Result<Box<dyn Read>> {
    Ok(match &cli.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open input {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    })
}

fn open_output(cli: &Cli) -> Result<Box<dyn Write>> {
    Ok(match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create output {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn run(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.rules)
        .with_context(|| format!("failed to read rules {}", cli.rules.display()))?;
    let rules = RuleSet::from_toml_str(&source)
        .with_context(|| format!("invalid rule set {}", cli.rules.display()))?;

    let mut config = rules.config();
    if let Some(label) = &cli.encoding {
        config.encoding = AsciiCompatibleEncoding::from_label(label)?;
    }
    if let Some(limit) = cli.max_buffered_bytes {
        config.max_buffered_bytes = Some(limit);
    }
    info!(
        "applying {} rules, encoding {}",
        rules.len(),
        config.encoding.name()
    );

    let mut input = open_input(cli)?;
    let error = Rc::new(RefCell::new(None));
    let sink = WriterSink {
        writer: open_output(cli)?,
        error: Rc::clone(&error),
    };
    let mut rewriter = HtmlRewriter::new(config, sink);
    rules.register(&mut rewriter)?;

    let chunk_size = usize::try_from(cli.chunk_size).context("chunk size is too large")?;
    let mut buf = vec![0u8; chunk_size];
    let mut total = 0usize;
    loop {
        let read = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err).context("failed to read input"),
        };
        total += read;
        rewriter.write(&buf[..read])?;
        if let Some(err) = error.borrow_mut().take() {
            return Err(err).context("failed to write output");
        }
    }
    rewriter.end()?;
    rewriter
        .into_sink()
        .flush()
        .context("failed to write output")?;
    debug!("rewrote {total} input bytes");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    run(&cli)
}
