use anyhow::Context;
use clap::{Parser, ValueEnum};
use delex_lexicalizer::{align, BatchReport, LexError, Lexicalizer, LexicalizerConfig, Mode, SurfaceVocabulary};
use delex_protocol::{AnnotatedToken, Lexicalization, Sentence, Template};
use rayon::prelude::*;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Extracts delexicalized templates from annotated JSON lines")]
struct Cli {
    /// One JSON document per line.
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Group contiguous verbs only, ignoring any supplied parse.
    #[arg(long)]
    no_parse: bool,

    #[arg(long, default_value = delex_lexicalizer::DEFAULT_PHRASE_LABEL)]
    phrase_label: String,

    #[arg(long, value_enum, default_value_t = ModeArg::Flat)]
    mode: ModeArg,

    /// Worker threads; defaults to one per core.
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Also write the lexicalizations as an rkyv archive.
    #[arg(long, value_name = "FILE")]
    archive: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Flat,
    Tree,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Flat => Mode::Flat,
            ModeArg::Tree => Mode::Tree,
        }
    }
}

impl Cli {
    fn config(&self) -> LexicalizerConfig {
        LexicalizerConfig {
            use_parse: !self.no_parse,
            phrase_label: self.phrase_label.clone(),
            mode: self.mode.into(),
        }
    }
}

#[derive(Deserialize)]
struct DocumentInput {
    id: String,
    sentences: Vec<SentenceInput>,
}

/// Either the annotation service's token objects or parallel columns.
#[derive(Deserialize)]
#[serde(untagged)]
enum SentenceInput {
    Annotated {
        tokens: Vec<TokenInput>,
        #[serde(default)]
        parse: Option<String>,
    },
    Columns {
        tokens: Vec<String>,
        lemmas: Vec<String>,
        pos: Vec<String>,
        #[serde(default)]
        parse: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenInput {
    original_text: String,
    lemma: String,
    pos: String,
}

impl SentenceInput {
    fn into_sentence(self) -> Result<Sentence, LexError> {
        match self {
            SentenceInput::Annotated { tokens, parse } => {
                let tokens = tokens
                    .into_iter()
                    .map(|t| AnnotatedToken::new(t.original_text, t.lemma, t.pos))
                    .collect();
                Ok(Sentence::new(tokens, parse))
            }
            SentenceInput::Columns {
                tokens,
                lemmas,
                pos,
                parse,
            } => align(&tokens, &lemmas, &pos, parse),
        }
    }
}

#[derive(Serialize)]
struct TemplateRecord<'a> {
    id: &'a str,
    template: &'a Template,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<String>,
}

fn parse_document(line: &str) -> anyhow::Result<(String, Vec<Sentence>)> {
    let document: DocumentInput = serde_json::from_str(line)?;
    let sentences = document
        .sentences
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.into_sentence().with_context(|| format!("sentence {}", i)))
        .collect::<anyhow::Result<Vec<_>>>()
        .with_context(|| format!("document {}", document.id))?;
    Ok((document.id, sentences))
}

struct Extraction {
    documents: Vec<(String, Lexicalization)>,
    vocabulary: SurfaceVocabulary,
    report: BatchReport,
}

/// Splits the lines into one chunk per worker, lexicalizes each chunk as a
/// batch, and folds the chunk reports together in input order.
fn extract(lexicalizer: &Lexicalizer, input: &str) -> Extraction {
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    let workers = rayon::current_num_threads().max(1);
    let chunk_size = ((lines.len() + workers - 1) / workers).max(1);

    let batches: Vec<_> = lines
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut ids = Vec::with_capacity(chunk.len());
            let documents: Vec<anyhow::Result<Vec<Sentence>>> = chunk
                .iter()
                .map(|&(n, line)| {
                    let (id, sentences) = parse_document(line).with_context(|| format!("line {}", n + 1))?;
                    ids.push(id);
                    Ok(sentences)
                })
                .collect();

            let (results, report) = lexicalizer.lexicalize_batch(documents);
            let documents: Vec<(String, Lexicalization)> =
                ids.into_iter().zip(results.into_iter().filter_map(Result::ok)).collect();
            (documents, report)
        })
        .collect();

    let mut extraction = Extraction {
        documents: Vec::with_capacity(lines.len()),
        vocabulary: SurfaceVocabulary::new(),
        report: BatchReport::default(),
    };

    for (documents, report) in batches {
        extraction.report.merge(report);
        for (id, lexicalization) in documents {
            extraction.vocabulary.extend(&lexicalization.dictionary);
            extraction.documents.push((id, lexicalization));
        }
    }

    extraction
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global()?;
    }

    info!("Reading documents from {:?}", cli.input);
    let input = fs::read_to_string(&cli.input).with_context(|| format!("reading {:?}", cli.input))?;

    let lexicalizer = Lexicalizer::new(cli.config());
    let extraction = extract(&lexicalizer, &input);
    info!("{}", extraction.report);

    let records: Vec<TemplateRecord<'_>> = extraction
        .documents
        .iter()
        .map(|(id, lexicalization)| TemplateRecord {
            id,
            template: &lexicalization.template,
            diagnostics: lexicalization.diagnostics.iter().map(ToString::to_string).collect(),
        })
        .collect();

    fs::create_dir_all(&cli.output_dir)?;
    let templates_path = cli.output_dir.join("templates.json");
    fs::write(&templates_path, serde_json::to_string_pretty(&records)?)?;
    let vocab_path = cli.output_dir.join("surfacevocab.json");
    fs::write(&vocab_path, serde_json::to_string_pretty(&extraction.vocabulary)?)?;
    info!("Wrote {:?} and {:?}", templates_path, vocab_path);

    if let Some(path) = &cli.archive {
        let lexicalizations: Vec<Lexicalization> = extraction.documents.into_iter().map(|(_, l)| l).collect();
        let mut serializer = AllocSerializer::<256>::default();
        serializer
            .serialize_value(&lexicalizations)
            .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {:?}", e))?;
        let bytes = serializer.into_serializer().into_inner();
        fs::write(path, bytes)?;
        info!("Archive written to {:?}", path);
    }

    Ok(())
}
