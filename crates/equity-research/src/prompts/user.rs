//! User message templates for the analyst stages

use equity_prompt::{JinjaTemplate, Result};

pub const FUNDAMENTAL_ANALYSIS: &str = "research.user.fundamental_analysis";
pub const MANAGEMENT_TONE_SEARCH: &str = "research.user.management_tone_search";
pub const SENTIMENT_ANALYSIS: &str = "research.user.sentiment_analysis";
pub const PORTFOLIO_SYNTHESIS: &str = "research.user.portfolio_synthesis";
pub const EDITORIAL_COMPILATION: &str = "research.user.editorial_compilation";
pub const PEER_DISCOVERY: &str = "research.user.peer_discovery";

pub fn fundamental_analysis() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        FUNDAMENTAL_ANALYSIS,
        r###"Role: Expert Fundamental Equity Analyst.
Objective: Analyze the provided financial data for {{ ticker }} and write a "Financial Deep Dive" section.

Market Context:
{{ market_data }}

Financial Data:
{{ financial_data }}

Peer Data (Competitors):
{{ peer_data }}

Instructions:
1. Analyze Revenue Growth, Margins (Gross, Operating, Net), and Returns (ROE, ROIC).
2. Assess the Balance Sheet health (Debt levels, Liquidity).
3. Calculate and interpret key valuation multiples (P/E, EV/EBITDA, P/FCF) using the current market data provided.
4. Create a "Relative Valuation" subsection comparing {{ ticker }} to its peers based on the provided Peer Data (P/E, Growth, Margins).
5. Identify any red flags or significant strengths in the numbers.
{% if degraded %}
Note: core market data could not be retrieved for {{ ticker }}. State clearly that the data is insufficient for a full analysis and limit yourself to what can be supported.
{% endif %}
Output:
- A Markdown section titled "## Financial Deep Dive".
- Use tables for key metrics and the Peer Comparison.
- Be data-driven and rigorous. No fluff."###,
    )
}

pub fn management_tone_search() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        MANAGEMENT_TONE_SEARCH,
        "Search for the latest earnings call transcripts, management quotes, and future guidance \
         for {{ ticker }}. Summarize the management's tone (Confident/Cautious/Bearish) and key quotes.",
    )
}

pub fn sentiment_analysis() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        SENTIMENT_ANALYSIS,
        r###"Role: Senior Market Sentiment & News Analyst.
Objective: Analyze recent news and market sentiment for {{ ticker }} and write a "Qualitative & Catalyst Analysis" section.

Context Data:
Recent News Headlines:
{{ news_data }}

Management Tone & Earnings Context (Web Search Results):
{{ management_context }}

Market Context:
{{ market_context }}

Instructions:
1. Summarize the dominant narrative driving the stock recently.
2. Identify key catalysts (upcoming earnings, product launches, regulatory decisions).
3. Assess management tone if available.
4. Gauge overall market sentiment (Bullish/Bearish/Neutral).

Output:
- A Markdown section titled "## Qualitative & Catalyst Analysis".
- Bullet points for key news items.
- A "Sentiment Score" (1-10) with a brief explanation."###,
    )
}

pub fn portfolio_synthesis() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        PORTFOLIO_SYNTHESIS,
        r###"Role: Hedge Fund Portfolio Manager.
Objective: Synthesize the Fundamental and Sentiment analysis into a final investment decision for {{ ticker }}.

Inputs:
[Market Data]
{{ market_data }}

[Financial Analysis]
{{ fundamental_analysis }}

[Sentiment Analysis]
{{ sentiment_analysis }}

Instructions:
1. Weigh the hard numbers (Fundamentals) against the market narrative (Sentiment).
2. Determine a clear Rating: {{ ratings }}. Choose exactly one.
3. Define the Investment Thesis: Why does this opportunity exist? What is the market missing?
4. Outline key risks.
5. Provide a specific Target Price or Range based on the current market price and your valuation assessment.

Output:
- A Markdown section titled "## Executive Summary & Investment Verdict".
- Start with the Rating and Target Price in bold, e.g. "**Rating: BUY** | **Target Price: ...**".
- Clearly stated Thesis and Risks."###,
    )
}

pub fn editorial_compilation() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        EDITORIAL_COMPILATION,
        r"Role: Chief Editor of an Equity Research Firm.
Objective: Compile and polish the final report for {{ ticker }}.
Report Date: {{ date }}

Content to Assemble:
{% for section in sections %}
{{ section }}
{% endfor %}
Instructions:
1. Assemble the sections into a coherent report.
2. Ensure consistent Markdown formatting.
3. Fix any grammatical errors or awkward phrasing.
4. Add a standard legal disclaimer at the bottom.
5. Ensure the tone is professional, institutional, and objective.

Output:
- The complete, polished Markdown report.",
    )
}

pub fn peer_discovery() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        PEER_DISCOVERY,
        r"Use live web search to identify {{ min_peers }}-{{ max_peers }} direct public competitors of {{ company_name }} ({{ ticker }}).
{% if sector %}Sector: {{ sector }}
{% endif %}{% if industry %}Industry: {{ industry }}
{% endif %}
Rules:
- Return each competitor's PRIMARY exchange ticker symbol as used by Yahoo Finance (include exchange suffixes such as .PA or .L where needed).
- Do NOT include {{ ticker }} itself, or any secondary listing, ADR, or share class of {{ company_name }}.
- Prefer companies in the same sector and industry with comparable business models.

Return ONLY the ticker symbols separated by commas (e.g. 'AMD, INTC, QCOM'). Do not add any other text.",
    )
}
