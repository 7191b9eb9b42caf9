use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use quotation_pdf::{
    BrandAssets, Credential, DocumentSession, Error, ExportOptions, ExportOutcome, JsonDirSource,
    LOGO_ENV, write_atomically,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_EMPTY: u8 = 2;
const EXIT_LOGIN_REQUIRED: u8 = 3;

#[derive(Parser)]
#[command(name = "quotation-pdf")]
#[command(version)]
#[command(about = "Render a sales quotation into a paginated A4 PDF", long_about = None)]
struct Cli {
    /// Quotation id, looked up as <RECORDS>/<ID>.json
    #[arg(value_name = "ID")]
    id: String,

    /// Directory holding quotation records
    #[arg(long, value_name = "DIR")]
    records: PathBuf,

    /// Access token presented to the record store
    #[arg(long)]
    token: Option<String>,

    /// Token the record store accepts; unset means any token is accepted
    #[arg(long, value_name = "TOKEN")]
    require_token: Option<String>,

    /// Logo image (PNG or JPEG); falls back to $QUOTATION_LOGO
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// JSON file with export options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (defaults to the configured file name)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<ExitCode, Error> {
    let options = match &cli.config {
        Some(path) => ExportOptions::from_json_file(path)?,
        None => ExportOptions::default(),
    };

    let mut source = JsonDirSource::new(&cli.records);
    if let Some(token) = cli.require_token {
        source = source.with_token(token);
    }
    let credential = cli.token.map(Credential::new).unwrap_or_default();

    let session = DocumentSession::load(&source, &cli.id, &credential)?;
    let totals = session.totals();
    log::info!(
        "Quotation {}: {} items, subtotal {}, VAT {}, total {}",
        session.record().quotation_number,
        session.record().items.len(),
        totals.subtotal,
        totals.tax_amount,
        totals.grand_total
    );

    if session.is_empty() {
        eprintln!("Quotation {} has no items; nothing to export", cli.id);
        return Ok(ExitCode::from(EXIT_EMPTY));
    }

    let logo = cli
        .logo
        .or_else(|| std::env::var_os(LOGO_ENV).map(PathBuf::from))
        .ok_or_else(|| {
            Error::InvalidConfig(format!("no logo given: pass --logo or set {LOGO_ENV}"))
        })?;
    let brand = BrandAssets::shared(&logo, options.company_footer.as_str())?;

    match session.export(&brand, &options)? {
        ExportOutcome::Exported(file) => {
            let output = cli.output.unwrap_or_else(|| PathBuf::from(&file.filename));
            write_atomically(&output, &file.bytes)?;
            println!("{}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        ExportOutcome::Empty => Ok(ExitCode::from(EXIT_EMPTY)),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) if e.requires_login() => {
            eprintln!("Session expired or token rejected; please log in again.");
            ExitCode::from(EXIT_LOGIN_REQUIRED)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
