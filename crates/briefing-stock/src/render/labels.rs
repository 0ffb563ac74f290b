//! Localized report strings

use briefing_prompt::Language;
use serde::Serialize;

/// Fixed strings used by both renderers
#[derive(Debug, Serialize)]
pub struct Labels {
    pub issued: &'static str,
    pub overview: &'static str,
    pub vix: &'static str,
    pub ticker: &'static str,
    pub price: &'static str,
    pub change: &'static str,
    pub market_cap: &'static str,
    pub pe_ratio: &'static str,
    pub dividend_yield: &'static str,
    pub target: &'static str,
    pub upside: &'static str,
    pub year_range: &'static str,
    pub from_low: &'static str,
    pub recommendation: &'static str,
    pub earnings: &'static str,
    pub news: &'static str,
    pub summary: &'static str,
    pub sentiment: &'static str,
    pub trending: &'static str,
    pub unavailable: &'static str,
    pub no_news: &'static str,
    pub quiet_news: &'static str,
    pub disclaimer: &'static str,
}

pub static KOREAN: Labels = Labels {
    issued: "발행일시",
    overview: "시장 개요",
    vix: "VIX 공포지수",
    ticker: "종목",
    price: "현재가",
    change: "등락률",
    market_cap: "시가총액",
    pe_ratio: "PER",
    dividend_yield: "배당수익률",
    target: "목표가",
    upside: "상승여력",
    year_range: "52주 범위",
    from_low: "저점 대비",
    recommendation: "투자의견",
    earnings: "실적 발표",
    news: "주요 뉴스",
    summary: "AI 요약",
    sentiment: "투자 심리",
    trending: "오늘의 화제 종목",
    unavailable: "시세 정보를 가져오지 못했습니다.",
    no_news: "관련 뉴스가 없습니다.",
    quiet_news: "최근 3일간 큰 뉴스가 없네요. 평온한 상태입니다! 😎",
    disclaimer: "본 리포트는 정보 제공용이며 투자 권유가 아닙니다.",
};

pub static ENGLISH: Labels = Labels {
    issued: "Issued",
    overview: "Market overview",
    vix: "VIX",
    ticker: "Ticker",
    price: "Price",
    change: "Change",
    market_cap: "Market cap",
    pe_ratio: "P/E",
    dividend_yield: "Dividend yield",
    target: "Target",
    upside: "Upside",
    year_range: "52-week range",
    from_low: "From low",
    recommendation: "Rating",
    earnings: "Earnings",
    news: "Top news",
    summary: "AI summary",
    sentiment: "Sentiment",
    trending: "Trending today",
    unavailable: "Quote data unavailable.",
    no_news: "No related news.",
    quiet_news: "No major news in the last few days. All quiet! 😎",
    disclaimer: "This report is for information only and is not investment advice.",
};

/// Labels for a language; languages other than Korean use English
pub fn labels(language: &Language) -> &'static Labels {
    match language {
        Language::Korean => &KOREAN,
        _ => &ENGLISH,
    }
}

/// Heading of the quote report
pub fn report_title(language: &Language, count: usize) -> String {
    match language {
        Language::Korean => format!("📉 월스트리트 {count}대 우량주 리포트"),
        _ => format!("📉 Wall Street Blue Chips: {count} Tickers"),
    }
}

/// Heading of the text digest
pub fn digest_title(language: &Language) -> &'static str {
    match language {
        Language::Korean => "오늘의 미국 주식 AI 브리핑",
        _ => "Today's US Stock AI Briefing",
    }
}
