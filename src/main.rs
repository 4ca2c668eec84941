//! cashdesk main entry point

mod attach;
mod console;

use anyhow::{bail, Context, Result};
use cashdesk_api::HttpRecordStore;
use cashdesk_config::Config;
use cashdesk_core::{
    BankAccountView, CoreError, DropFilter, FormField, InMemoryPreviewRegistry, ListReconciler, NotifierRef,
    ReferenceData, StoreRef, SubmitOutcome, TransactionKind, TransactionWorkspace, WorkspaceOptions,
};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use console::ConsoleNotifier;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cashdesk")]
#[command(author = "cashdesk contributors")]
#[command(version = "0.1.0")]
#[command(about = "Create, edit and delete transactions on a remote record store", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Active account id (overrides session.account_id)
    #[arg(short, long, global = true)]
    account: Option<String>,

    /// Record store base URL (overrides remote.base_url)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a default configuration, or write it to a file
    InitConfig {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List transactions
    List,
    /// List categories
    Categories,
    /// List bank accounts
    BankAccounts,
    /// Show one bank account
    BankAccount { id: String },
    /// Create a transaction
    Create(FormArgs),
    /// Edit a transaction
    Edit {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete a transaction
    Delete { id: String },
    /// Delete an account
    DeleteAccount { id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum KindArg {
    Credit,
    Debit,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Credit => TransactionKind::Credit,
            KindArg::Debit => TransactionKind::Debit,
        }
    }
}

#[derive(ClapArgs, Debug, Default)]
struct FormArgs {
    /// Credit or debit (required when creating)
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,
    /// Date, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    /// Category id or name
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,
    /// Bank account id or name
    #[arg(long)]
    bank_account: Option<String>,
    /// Files to attach (glob patterns allowed); replaces pending attachments
    #[arg(long = "attach")]
    attachments: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::InitConfig { output } = &args.command {
        return init_config(output.as_ref());
    }

    let mut config = match Config::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            std::process::exit(2);
        }
    };
    if let Some(account) = &args.account {
        config.session.account_id = account.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.remote.base_url = base_url.clone();
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    log::debug!("config loaded from {}", args.config.display());

    let rt = Runtime::new()?;
    rt.block_on(run(args.command, config))
}

fn init_config(output: Option<&PathBuf>) -> Result<()> {
    let template = Config::generate_default();
    match output {
        Some(path) => {
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            std::fs::write(path, template)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote default configuration to {}", path.display());
        }
        None => print!("{}", template),
    }
    Ok(())
}

async fn run(command: Command, config: Config) -> Result<()> {
    let store: StoreRef = Arc::new(HttpRecordStore::from_config(&config)?);
    let notifier: NotifierRef = Arc::new(ConsoleNotifier::new());

    match command {
        Command::InitConfig { .. } => Ok(()),
        Command::List => {
            let list = ListReconciler::new(store, notifier);
            list.load().await?;
            console::print_transactions(&list.items());
            Ok(())
        }
        Command::Categories => {
            let data = ReferenceData::fetch(store.as_ref(), notifier.as_ref()).await;
            console::print_categories(&data.categories);
            Ok(())
        }
        Command::BankAccounts => {
            let data = ReferenceData::fetch(store.as_ref(), notifier.as_ref()).await;
            console::print_bank_accounts(&data.bank_accounts);
            Ok(())
        }
        Command::BankAccount { id } => {
            let view = BankAccountView::new(store, notifier);
            let detail = view.load(&id).await?;
            console::print_bank_account(&detail);
            Ok(())
        }
        Command::Create(form) => {
            let mut workspace = workspace(store, notifier, &config)?;
            let kind = form
                .kind
                .context("--kind is required when creating a transaction")?;
            workspace.open_form(None).await?;
            workspace.set_kind(kind.into())?;
            fill_form(&mut workspace, form, &config)?;
            save(&mut workspace).await
        }
        Command::Edit { id, form } => {
            let mut workspace = workspace(store, notifier, &config)?;
            workspace.load_list().await?;
            workspace.open_form(Some(&id)).await?;
            if let Some(kind) = form.kind {
                workspace.set_kind(kind.into())?;
            }
            fill_form(&mut workspace, form, &config)?;
            save(&mut workspace).await
        }
        Command::Delete { id } => {
            let list = ListReconciler::new(store, notifier)
                .reload_on_delete_failure(config.list.reload_on_delete_failure);
            list.remove(&id).await?;
            Ok(())
        }
        Command::DeleteAccount { id } => {
            let view = BankAccountView::new(store, notifier);
            view.delete_account(&id).await?;
            Ok(())
        }
    }
}

fn workspace(store: StoreRef, notifier: NotifierRef, config: &Config) -> Result<TransactionWorkspace> {
    let registry = Arc::new(InMemoryPreviewRegistry::new());
    let workspace = TransactionWorkspace::new(
        store,
        notifier,
        registry,
        WorkspaceOptions::from_config(config),
    )?;
    Ok(workspace)
}

/// Apply the given options to the open form, resolving names against the
/// reference data fetched for it
fn fill_form(workspace: &mut TransactionWorkspace, form: FormArgs, config: &Config) -> Result<()> {
    if let Some(date) = form.date {
        workspace.set_field(FormField::Date, date)?;
    }
    if let Some(category) = form.category {
        let id = resolve(&category, workspace.form().categories().iter().map(|c| (&c.id, &c.name)));
        workspace.set_field(FormField::CategoryId, id)?;
    }
    if let Some(description) = form.description {
        workspace.set_field(FormField::Description, description)?;
    }
    if let Some(amount) = form.amount {
        workspace.set_field(FormField::Amount, amount)?;
    }
    if let Some(bank_account) = form.bank_account {
        let id = resolve(
            &bank_account,
            workspace.form().bank_accounts().iter().map(|b| (&b.id, &b.name)),
        );
        workspace.set_field(FormField::BankAccountId, id)?;
    }
    if !form.attachments.is_empty() {
        let filter = DropFilter::from_config(&config.attachments);
        let files = attach::read_attachments(&form.attachments, &filter)?;
        workspace.attach_files(files)?;
    }
    Ok(())
}

/// Map a display name to its id; ids and unknown values pass through
fn resolve<'a>(value: &str, options: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    let value = value.trim();
    let mut by_name = None;
    for (id, name) in options {
        if id == value {
            return id.clone();
        }
        if by_name.is_none() && name.eq_ignore_ascii_case(value) {
            by_name = Some(id.clone());
        }
    }
    by_name.unwrap_or_else(|| value.to_string())
}

async fn save(workspace: &mut TransactionWorkspace) -> Result<()> {
    match workspace.save().await? {
        SubmitOutcome::Saved { transaction, mode } => {
            match transaction {
                Some(transaction) => println!("{}", console::transaction_line(&transaction)),
                None => log::info!("{:?} accepted without a record in the response", mode),
            }
            Ok(())
        }
        SubmitOutcome::ValidationFailed(errors) => {
            let error = CoreError::ValidationFailed { errors };
            eprintln!("{}", error.to_details());
            Err(error.into())
        }
        SubmitOutcome::RequestFailed { error, .. } => Err(error.into()),
        SubmitOutcome::AlreadySubmitting => bail!("a submission is already in progress"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_id_or_name() {
        let categories = vec![
            ("c-1".to_string(), "Food".to_string()),
            ("c-2".to_string(), "Rent".to_string()),
        ];
        let options = || categories.iter().map(|(id, name)| (id, name));

        assert_eq!(resolve("c-2", options()), "c-2");
        assert_eq!(resolve("food", options()), "c-1");
        assert_eq!(resolve(" unknown ", options()), "unknown");
    }

    #[test]
    fn test_cli_parses_create() {
        let args = Args::try_parse_from([
            "cashdesk",
            "--account",
            "acc-1",
            "create",
            "--kind",
            "debit",
            "--amount",
            "12.50",
            "--attach",
            "a.png",
            "--attach",
            "b.pdf",
        ])
        .unwrap();

        assert_eq!(args.account.as_deref(), Some("acc-1"));
        match args.command {
            Command::Create(form) => {
                assert!(matches!(form.kind, Some(KindArg::Debit)));
                assert_eq!(form.amount.as_deref(), Some("12.50"));
                assert_eq!(form.attachments, vec!["a.png", "b.pdf"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
