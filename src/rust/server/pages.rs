use minijinja::{context, Environment};

use super::backend::AnalysisResult;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sentiment Analyzer</title>
  <style>
    body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
    textarea { width: 100%; min-height: 6rem; }
    .error { color: #b00020; }
    .result { padding: 1rem; border: 1px solid #ccc; }
    .positive { color: #1b7f3b; }
    .neutral { color: #555; }
    .negative { color: #b00020; }
  </style>
</head>
<body>
  <h1>Sentiment Analyzer</h1>
  <form method="post" action="/analyze">
    <textarea name="text" placeholder="Type a product review...">{{ input_text }}</textarea>
    <button type="submit">Analyze</button>
  </form>
  {% if error %}
  <p class="error">{{ error }}</p>
  {% endif %}
  {% if result %}
  <div class="result">
    <p>Sentiment: <strong class="{{ result.sentiment }}">{{ result.sentiment }}</strong></p>
    <p>Confidence: {{ (result.confidence * 100)|round(1) }}%</p>
  </div>
  {% endif %}
</body>
</html>
"#;

/// Template environment holding the single `index.html` page.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;
    Ok(env)
}

pub fn render_index(
    env: &Environment<'static>,
    input_text: &str,
    result: Option<&AnalysisResult>,
    error: Option<&str>,
) -> Result<String, minijinja::Error> {
    env.get_template("index.html")?.render(context! {
        input_text => input_text,
        result => result,
        error => error,
    })
}
