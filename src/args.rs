//! These structs provide the CLI interface for the pocket CLI.

use crate::filter::{FilterSpec, TypeFilter};
use crate::model::{Category, TransactionType};
use crate::prefs::{Language, Theme};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// pocket: A command-line tool for keeping track of your money.
///
/// Record income and expenses, look back through your history with filters, check your balance
/// and see how this month's budgets are holding up. Everything is kept in a local store under
/// the pocket home directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record a new income or expense.
    Add(AddArgs),
    /// Remove a transaction by its id.
    Delete(DeleteArgs),
    /// Show the transaction history, newest first, optionally filtered.
    List(ListArgs),
    /// Show the balance along with total income and expense.
    Summary,
    /// Show the monthly budget sheet, or check a new budget.
    Budget(BudgetArgs),
    /// Show or change the display language.
    Language(LanguageArgs),
    /// Show or change the color theme.
    Theme(ThemeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where pocket data and configuration is held. Defaults to ~/pocket
    #[arg(long, env = "POCKET_HOME", default_value_t = default_pocket_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `pocket add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The amount, digits only. Group separators are allowed, e.g. 1.200.000 or 1,200,000
    #[arg(allow_hyphen_values = true)]
    amount: String,

    /// Either "income" or "expense"
    #[arg(long = "type", default_value_t = TransactionType::Income)]
    kind: TransactionType,

    /// A short description of the transaction
    #[arg(long, default_value = "")]
    note: String,

    /// The date of the transaction as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// One of: shopping, healthcare, foods, entertainment, travel, learning, house
    #[arg(long)]
    category: Option<Category>,
}

impl AddArgs {
    pub fn new(amount: impl Into<String>, kind: TransactionType) -> Self {
        Self {
            amount: amount.into(),
            kind,
            note: String::new(),
            date: None,
            category: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }
}

/// (Not shown): Args for the `pocket delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction, as shown by `pocket list`
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `pocket list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Only show transactions on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Only show transactions on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only show transactions in this category. Can be given more than once.
    #[arg(long = "category")]
    categories: Vec<Category>,

    /// One of: all, income, expense
    #[arg(long = "type", default_value_t = TypeFilter::All)]
    kind: TypeFilter,
}

impl ListArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_type(mut self, kind: TypeFilter) -> Self {
        self.kind = kind;
        self
    }

    /// The filter described by these arguments.
    pub fn filter(&self) -> FilterSpec {
        FilterSpec {
            start_date: self.from,
            end_date: self.to,
            categories: self.categories.iter().copied().collect(),
            kind: self.kind,
        }
    }
}

/// (Not shown): Args for the `pocket budget` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct BudgetArgs {
    #[command(subcommand)]
    action: Option<BudgetSubcommand>,

    /// The month to show, 1-12. Defaults to the current month.
    #[arg(long)]
    month: Option<u32>,

    /// The year to show. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,
}

impl BudgetArgs {
    pub fn new(month: Option<u32>, year: Option<i32>) -> Self {
        Self {
            action: None,
            month,
            year,
        }
    }

    pub fn action(&self) -> Option<&BudgetSubcommand> {
        self.action.as_ref()
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum BudgetSubcommand {
    /// Check the details of a new monthly budget.
    New(NewBudgetArgs),
}

/// (Not shown): Args for the `pocket budget new` command.
#[derive(Debug, Parser, Clone)]
pub struct NewBudgetArgs {
    /// The amount to allocate
    amount: String,

    /// The category the budget is for
    #[arg(long)]
    category: Category,

    /// The month, 1-12. Defaults to the current month.
    #[arg(long)]
    month: Option<u32>,

    /// The year, within two years of the current one. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,
}

impl NewBudgetArgs {
    pub fn new(amount: impl Into<String>, category: Category) -> Self {
        Self {
            amount: amount.into(),
            category,
            month: None,
            year: None,
        }
    }

    pub fn with_month(mut self, month: u32, year: i32) -> Self {
        self.month = Some(month);
        self.year = Some(year);
        self
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

/// (Not shown): Args for the `pocket language` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct LanguageArgs {
    /// The language to switch to: "en" or "vi". Omit to show the current language.
    language: Option<Language>,
}

impl LanguageArgs {
    pub fn new(language: Option<Language>) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }
}

/// (Not shown): Args for the `pocket theme` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ThemeArgs {
    /// The theme to switch to: "light" or "dark". Omit to show the current theme.
    theme: Option<Theme>,
}

impl ThemeArgs {
    pub fn new(theme: Option<Theme>) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }
}

fn default_pocket_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("pocket"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or POCKET_HOME instead of relying on the default \
                pocket home directory. If you continue using the program right now, your data \
                will be kept in ./pocket",
            );
            PathBuf::from("pocket")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pocket").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&[
            "--home",
            "/tmp/p",
            "add",
            "450.000",
            "--type",
            "expense",
            "--note",
            " Grocery ",
            "--date",
            "2025-10-18",
            "--category",
            "foods",
        ]);
        assert_eq!(args.common().home().path(), Path::new("/tmp/p"));
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.amount(), "450.000");
        assert_eq!(add.kind(), TransactionType::Expense);
        assert_eq!(add.note(), " Grocery ");
        assert_eq!(add.date(), NaiveDate::from_ymd_opt(2025, 10, 18));
        assert_eq!(add.category(), Some(Category::Foods));
    }

    #[test]
    fn test_add_defaults() {
        let args = parse(&["--home", "/tmp/p", "add", "100"]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.kind(), TransactionType::Income);
        assert_eq!(add.date(), None);
        assert_eq!(add.category(), None);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = Args::try_parse_from(["pocket", "add", "100", "--category", "pets"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_filter() {
        let args = parse(&[
            "--home",
            "/tmp/p",
            "list",
            "--from",
            "2025-10-01",
            "--category",
            "foods",
            "--category",
            "travel",
            "--type",
            "expense",
        ]);
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        let filter = list.filter();
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 10, 1));
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.categories.len(), 2);
        assert_eq!(filter.kind, TypeFilter::Expense);
    }

    #[test]
    fn test_list_without_flags_is_unrestricted() {
        let args = parse(&["--home", "/tmp/p", "list"]);
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert!(list.filter().is_unrestricted());
    }

    #[test]
    fn test_parse_budget_new() {
        let args = parse(&[
            "--home",
            "/tmp/p",
            "budget",
            "new",
            "2000000",
            "--category",
            "travel",
            "--month",
            "11",
        ]);
        let Command::Budget(budget) = args.command() else {
            panic!("expected budget");
        };
        let Some(BudgetSubcommand::New(new)) = budget.action() else {
            panic!("expected budget new");
        };
        assert_eq!(new.amount(), "2000000");
        assert_eq!(new.category(), Category::Travel);
        assert_eq!(new.month(), Some(11));
        assert_eq!(new.year(), None);
    }

    #[test]
    fn test_parse_prefs() {
        let args = parse(&["--home", "/tmp/p", "language", "vi"]);
        let Command::Language(language) = args.command() else {
            panic!("expected language");
        };
        assert_eq!(language.language(), Some(Language::Vi));

        let args = parse(&["--home", "/tmp/p", "theme"]);
        let Command::Theme(theme) = args.command() else {
            panic!("expected theme");
        };
        assert_eq!(theme.theme(), None);
    }
}
