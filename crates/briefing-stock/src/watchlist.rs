//! Watchlist sources: the built-in table, CSV files and Google Sheets

use crate::api::SheetsClient;
use crate::error::{BriefingError, Result};
use crate::model::WatchlistEntry;
use async_trait::async_trait;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Tab read when a sheet source names none
pub const DEFAULT_SHEET_TAB: &str = "주식키워드";

/// Built-in watchlist: display name, ticker and space-separated exclude keywords
pub const BUILTIN_WATCHLIST: [(&str, &str, &str); 16] = [
    ("애플", "AAPL", "사과 레시피 다이어트 과일"),
    ("마이크로소프트", "MSFT", ""),
    ("엔비디아", "NVDA", ""),
    ("알파벳", "GOOGL", "영어 교육 학습 유치원"),
    ("아마존", "AMZN", "정글 열대우림 브라질"),
    ("메타", "META", "메타버스 meta-verse 가상현실"),
    ("테슬라", "TSLA", "니콜라 발명가"),
    ("브로드컴", "AVGO", ""),
    ("일라이 릴리", "LLY", ""),
    ("비자", "V", "입국 여권 발급 거절 신청 여행"),
    ("존슨앤존슨", "JNJ", "베이비파우더"),
    ("오라클", "ORCL", "예언 점괘 게임"),
    ("버크셔 해서웨이", "BRK-B", ""),
    ("팔란티어", "PLTR", "반지의제왕 판타지"),
    ("월마트", "WMT", "사고 사건"),
    ("코스트코", "COST", "레시피 요리"),
];

/// Somewhere the run's tickers come from
#[async_trait]
pub trait WatchlistSource: Send + Sync {
    /// Active entries, in source order
    async fn load(&self) -> Result<Vec<WatchlistEntry>>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

/// The built-in 16-ticker table
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinWatchlist;

impl BuiltinWatchlist {
    pub fn entries() -> Vec<WatchlistEntry> {
        BUILTIN_WATCHLIST
            .iter()
            .map(|(name, ticker, excludes)| {
                WatchlistEntry::new(*name, *ticker).with_excludes(excludes.split_whitespace())
            })
            .collect()
    }
}

#[async_trait]
impl WatchlistSource for BuiltinWatchlist {
    async fn load(&self) -> Result<Vec<WatchlistEntry>> {
        Ok(Self::entries())
    }

    fn describe(&self) -> String {
        "built-in watchlist".to_string()
    }
}

/// A local CSV file with Ticker, Name, Status and optional Exclude columns
#[derive(Debug, Clone)]
pub struct CsvFileWatchlist {
    path: PathBuf,
}

impl CsvFileWatchlist {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WatchlistSource for CsvFileWatchlist {
    async fn load(&self) -> Result<Vec<WatchlistEntry>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            BriefingError::WatchlistError(format!("cannot read {}: {e}", self.path.display()))
        })?;
        parse_watchlist_csv(bytes.as_slice())
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}

/// One tab of a Google Sheet
pub struct SheetWatchlist {
    client: SheetsClient,
    sheet_id: String,
    tab: String,
}

impl SheetWatchlist {
    pub fn new(client: SheetsClient, sheet_id: impl Into<String>, tab: Option<String>) -> Self {
        Self {
            client,
            sheet_id: sheet_id.into(),
            tab: tab.unwrap_or_else(|| DEFAULT_SHEET_TAB.to_string()),
        }
    }
}

#[async_trait]
impl WatchlistSource for SheetWatchlist {
    async fn load(&self) -> Result<Vec<WatchlistEntry>> {
        let csv = self.client.fetch_csv(&self.sheet_id, &self.tab).await?;
        parse_watchlist_csv(csv.as_bytes())
    }

    fn describe(&self) -> String {
        format!("sheet {} tab {}", self.sheet_id, self.tab)
    }
}

/// Column positions found in the header row
struct Columns {
    ticker: usize,
    name: Option<usize>,
    status: usize,
    exclude: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted))
        };

        let ticker = find("ticker")
            .ok_or_else(|| BriefingError::WatchlistError("missing Ticker column".to_string()))?;
        let status = find("status")
            .ok_or_else(|| BriefingError::WatchlistError("missing Status column".to_string()))?;

        Ok(Self {
            ticker,
            name: find("name"),
            status,
            exclude: find("exclude"),
        })
    }
}

/// Parse watchlist rows, keeping only those whose Status is `active`
///
/// Header names and cells are trimmed; header and status matching ignore
/// case. A missing Name falls back to the ticker.
pub fn parse_watchlist_csv<R: Read>(reader: R) -> Result<Vec<WatchlistEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::locate(rdr.headers()?)?;
    let mut entries = Vec::new();

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or_default();

        if !cell(Some(columns.status)).eq_ignore_ascii_case("active") {
            continue;
        }

        let ticker = cell(Some(columns.ticker));
        if ticker.is_empty() {
            warn!(row = line + 2, "active row without a ticker skipped");
            continue;
        }

        let name = match cell(columns.name) {
            "" => ticker,
            name => name,
        };

        entries.push(
            WatchlistEntry::new(name, ticker.to_ascii_uppercase())
                .with_excludes(cell(columns.exclude).split_whitespace()),
        );
    }

    debug!(count = entries.len(), "parsed watchlist");
    Ok(entries)
}

/// Append discovered tickers that are not already on the watchlist
///
/// Returns how many entries were added.
pub fn merge_trending(entries: &mut Vec<WatchlistEntry>, tickers: &[String]) -> usize {
    let mut added = 0;
    for ticker in tickers {
        if entries.iter().any(|e| e.ticker.eq_ignore_ascii_case(ticker)) {
            debug!(%ticker, "trending ticker already on the watchlist");
            continue;
        }
        info!(%ticker, "adding trending ticker");
        entries.push(WatchlistEntry::trending(ticker.as_str()));
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryOrigin;

    #[test]
    fn test_builtin_table() {
        let entries = BuiltinWatchlist::entries();
        assert_eq!(entries.len(), 16);
        assert_eq!(entries[0].ticker, "AAPL");
        assert_eq!(entries[0].exclude_keywords(), ["사과", "레시피", "다이어트", "과일"]);
        assert!(entries[1].exclude_keywords().is_empty());
        assert_eq!(entries[12].ticker, "BRK-B");
    }

    #[test]
    fn test_only_active_rows() {
        let csv = " Ticker , Name ,Status,Exclude\n\
                   AAPL,애플,Active,사과 다이어트\n\
                   MSFT,마이크로소프트,inactive,\n\
                   nvda,엔비디아, ACTIVE ,\n";
        let entries = parse_watchlist_csv(csv.as_bytes()).unwrap();

        let tickers: Vec<_> = entries.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, ["AAPL", "NVDA"]);
        assert_eq!(entries[0].exclude_keywords(), ["사과", "다이어트"]);
        assert_eq!(entries[1].display_name, "엔비디아");
    }

    #[test]
    fn test_short_rows_and_missing_names() {
        let csv = "Ticker,Status,Name\nPLTR,active\n,active,빈칸\nWMT,active,월마트\n";
        let entries = parse_watchlist_csv(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display_name, "PLTR");
        assert_eq!(entries[1].display_name, "월마트");
    }

    #[test]
    fn test_missing_status_column() {
        let err = parse_watchlist_csv("Ticker,Name\nAAPL,애플\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Status"));
    }

    #[tokio::test]
    async fn test_csv_file_source() {
        let path = std::env::temp_dir().join(format!("watchlist-{}.csv", std::process::id()));
        std::fs::write(&path, "Ticker,Name,Status\nCOST,코스트코,Active\n").unwrap();

        let entries = CsvFileWatchlist::new(&path).load().await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ticker, "COST");
    }

    #[tokio::test]
    async fn test_missing_csv_file() {
        let source = CsvFileWatchlist::new("/nonexistent/watchlist.csv");
        assert!(matches!(source.load().await, Err(BriefingError::WatchlistError(_))));
    }

    #[test]
    fn test_merge_trending_skips_known_tickers() {
        let mut entries = vec![WatchlistEntry::new("엔비디아", "NVDA")];
        let added = merge_trending(&mut entries, &["NVDA".to_string(), "PLTR".to_string()]);

        assert_eq!(added, 1);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].ticker, "PLTR");
        assert_eq!(entries[1].origin, EntryOrigin::Trending);
    }
}
