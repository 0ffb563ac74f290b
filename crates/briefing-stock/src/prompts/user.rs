//! Per-stage request templates

use briefing_prompt::{JinjaTemplate, Result};

/// Three-line summary plus sentiment for one ticker's news
///
/// Variables: `ticker`, `name`, `news` (list of `{title, description}`)
pub fn summarize_news_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        super::SUMMARIZE_NEWS,
        r"다음은 {{ name }}({{ ticker }}) 관련 최신 뉴스입니다.

{% for item in news %}- {{ item.title }}{% if item.description %}: {{ item.description }}{% endif %}
{% endfor %}
위 뉴스를 바탕으로 투자자를 위한 핵심 요약 3줄과 투자 심리(긍정/중립/부정)를 작성하세요.
답변은 아래 네 줄만 작성하세요. 마지막 줄의 값은 positive, neutral, negative 중 하나입니다.
1. <요약>
2. <요약>
3. <요약>
SENTIMENT: positive|neutral|negative",
        r"Here is the latest news about {{ name }} ({{ ticker }}).

{% for item in news %}- {{ item.title }}{% if item.description %}: {{ item.description }}{% endif %}
{% endfor %}
Based on this news, write a three-line summary for investors and the overall investor sentiment.
Reply with exactly these four lines. The last value is one of positive, neutral or negative.
1. <summary>
2. <summary>
3. <summary>
SENTIMENT: positive|neutral|negative",
    )
}

/// Literal-order translation of numbered titles
///
/// Variables: `count`, `target` (language name), `titles`
pub fn translate_titles_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        super::TRANSLATE_TITLES,
        r"다음 뉴스 제목 {{ count }}개를 {{ target }}로 번역하세요. 순서를 바꾸지 마세요.
회사명과 티커는 그대로 두세요.
답변은 정확히 {{ count }}줄이며 각 줄은 '번호. 번역문' 형식입니다.

{% for title in titles %}{{ loop.index }}. {{ title }}
{% endfor %}",
        r"Translate the following {{ count }} news headlines into {{ target }}, keeping their order.
Leave company names and tickers unchanged.
Reply with exactly {{ count }} lines, each in the form 'number. translation'.

{% for title in titles %}{{ loop.index }}. {{ title }}
{% endfor %}",
    )
}

/// Up to two tickers most talked about in today's headlines
///
/// Variables: `headlines`
pub fn hot_tickers_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        super::PICK_HOT_TICKERS,
        r"오늘의 미국 경제 헤드라인입니다.

{% for headline in headlines %}- {{ headline }}
{% endfor %}
가장 주목받는 미국 상장 종목을 최대 2개 고르세요.
답변은 한 줄만 작성하세요: TICKERS: AAPL, NVDA",
        r"Here are today's US business headlines.

{% for headline in headlines %}- {{ headline }}
{% endfor %}
Pick at most 2 US-listed stocks that draw the most attention.
Reply with a single line only: TICKERS: AAPL, NVDA",
    )
}
