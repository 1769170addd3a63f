use crate::config::DashboardConfig;

pub fn render_index(config: &DashboardConfig) -> String {
    let period = &config.period;
    let period_label = format!(
        "Weeks {}\u{2013}{}, {}",
        period.start_week, period.end_week, period.year
    );
    INDEX_HTML
        .replace("{{PERIOD_LABEL}}", &period_label)
        .replace("{{GOAL}}", &format_kr(period.goal_amount))
}

// "96555" -> "96.555 kr." (the sheet's Danish grouping).
pub fn format_kr(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-{grouped} kr.")
    } else {
        format!("{grouped} kr.")
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Sales Goal Dashboard</title>
  <style>
    :root {
      --bg-1: #eef3f8;
      --bg-2: #d7e4f2;
      --ink: #22303c;
      --accent: #4682b4;
      --accent-soft: #9fc4e0;
      --goal: #e8923a;
      --muted: #6b7a88;
      --card: #ffffff;
      --track: #e3e8ee;
      --shadow: 0 18px 44px rgba(34, 48, 60, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      display: grid;
      place-items: start center;
      padding: 36px 20px 56px;
    }

    .board {
      width: min(980px, 100%);
      display: grid;
      gap: 24px;
    }

    header {
      text-align: center;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.7rem, 3.4vw, 2.4rem);
      font-weight: 650;
    }

    .period {
      margin: 4px 0 0;
      color: var(--muted);
      font-size: 1rem;
    }

    .row {
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      border: 1px solid rgba(34, 48, 60, 0.07);
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .card h2 {
      margin: 0 0 12px;
      font-size: 1.05rem;
      font-weight: 600;
      color: var(--muted);
      text-transform: uppercase;
      letter-spacing: 0.08em;
    }

    #weekly-chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    #weekly-chart text {
      font-family: inherit;
    }

    .gauge-wrap {
      display: grid;
      place-items: center;
      gap: 10px;
    }

    #gauge {
      width: 180px;
      height: 180px;
    }

    .gauge-track {
      fill: none;
      stroke: var(--track);
      stroke-width: 16;
    }

    .gauge-arc {
      fill: none;
      stroke: var(--accent);
      stroke-width: 16;
      stroke-linecap: round;
      transform: rotate(-90deg);
      transform-origin: 50% 50%;
      transition: stroke-dasharray 500ms ease;
    }

    .gauge-text {
      font-size: 26px;
      font-weight: 650;
      fill: var(--ink);
      text-anchor: middle;
      dominant-baseline: middle;
    }

    .gauge-sub {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .tiles {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .tile {
      background: var(--card);
      border-radius: 14px;
      border: 1px solid rgba(34, 48, 60, 0.07);
      box-shadow: var(--shadow);
      padding: 16px;
      text-align: center;
    }

    .tile .label {
      display: block;
      font-size: 0.8rem;
      letter-spacing: 0.1em;
      text-transform: uppercase;
      color: var(--muted);
    }

    .tile .value {
      display: block;
      margin-top: 6px;
      font-size: 1.45rem;
      font-weight: 650;
      color: var(--accent);
    }

    #products {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 2.5;
    }

    .chart-point {
      fill: #ffffff;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-goal {
      stroke: var(--goal);
      stroke-width: 2;
      stroke-dasharray: 6 5;
    }

    .chart-grid {
      stroke: rgba(34, 48, 60, 0.1);
    }

    .chart-now {
      fill: var(--accent-soft);
      opacity: 0.25;
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .progress-wrap {
      display: grid;
      gap: 8px;
    }

    .progress-caption {
      text-align: center;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .progress-track {
      background: var(--track);
      border-radius: 10px;
      height: 28px;
      overflow: hidden;
    }

    .progress-fill {
      background: linear-gradient(90deg, var(--accent), var(--accent-soft));
      height: 100%;
      width: 0;
      border-radius: 10px;
      transition: width 500ms ease;
    }

    .status {
      text-align: center;
      min-height: 1.2em;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .status[data-type="error"] {
      color: #b3402e;
    }

    @media (max-width: 720px) {
      .row {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="board">
    <header>
      <h1>Sales Goal Dashboard</h1>
      <p class="period">{{PERIOD_LABEL}} &middot; goal {{GOAL}}</p>
    </header>

    <div class="row">
      <section class="card">
        <h2>Weekly revenue</h2>
        <svg id="weekly-chart" viewBox="0 0 640 280" role="img" aria-label="Weekly revenue chart"></svg>
      </section>
      <section class="card gauge-wrap">
        <h2>Goal reached</h2>
        <svg id="gauge" viewBox="0 0 120 120" role="img" aria-label="Percent of goal">
          <circle class="gauge-track" cx="60" cy="60" r="50"></circle>
          <circle class="gauge-arc" id="gauge-arc" cx="60" cy="60" r="50"></circle>
          <text class="gauge-text" id="gauge-text" x="60" y="62">--%</text>
        </svg>
        <span class="gauge-sub" id="gauge-sub">of {{GOAL}}</span>
      </section>
    </div>

    <section class="tiles">
      <div class="tile">
        <span class="label">Total</span>
        <span class="value" id="tile-total">--</span>
      </div>
      <div class="tile">
        <span class="label">Weekly goal</span>
        <span class="value" id="tile-weekly-goal">--</span>
      </div>
      <div class="tile">
        <span class="label">Needed per remaining week</span>
        <span class="value" id="tile-remaining">--</span>
      </div>
      <div class="tile">
        <span class="label">Hit rate</span>
        <span class="value" id="tile-hit-rate">--</span>
      </div>
    </section>

    <section class="card">
      <h2>Top products</h2>
      <div id="products"></div>
    </section>

    <section class="progress-wrap">
      <div class="progress-caption" id="progress-caption">--</div>
      <div class="progress-track">
        <div class="progress-fill" id="progress-fill"></div>
      </div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const REFRESH_MS = 300000;

    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('weekly-chart');
    const gaugeArc = document.getElementById('gauge-arc');
    const gaugeText = document.getElementById('gauge-text');
    const productsEl = document.getElementById('products');
    const progressFill = document.getElementById('progress-fill');
    const progressCaption = document.getElementById('progress-caption');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const formatKr = (value) => {
      const rounded = Math.round(value);
      return rounded.toLocaleString('da-DK') + ' kr.';
    };

    const renderGauge = (percent) => {
      const radius = 50;
      const circumference = 2 * Math.PI * radius;
      const clamped = Math.max(0, Math.min(percent, 1));
      gaugeArc.setAttribute(
        'stroke-dasharray',
        `${(clamped * circumference).toFixed(1)} ${circumference.toFixed(1)}`
      );
      gaugeText.textContent = (percent * 100).toFixed(2) + '%';
    };

    const renderChart = (report) => {
      const width = 640;
      const height = 280;
      const padX = 48;
      const padY = 36;
      const top = 20;

      const points = report.weekly;
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }

      let max = Math.max(report.weekly_goal, ...points.map((p) => p.total));
      if (max <= 0) {
        max = 1;
      }

      const xStep = points.length > 1 ? (width - padX * 2) / (points.length - 1) : 0;
      const x = (i) => padX + i * xStep;
      const y = (v) => height - padY - (v / max) * (height - padY - top);

      let parts = '';

      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = (max * i) / ticks;
        const yPos = y(value);
        parts += `<line class="chart-grid" x1="${padX}" y1="${yPos}" x2="${width - padX}" y2="${yPos}" />`;
        parts += `<text class="chart-label" x="${padX - 8}" y="${yPos + 4}" text-anchor="end">${Math.round(value).toLocaleString('da-DK')}</text>`;
      }

      const nowIndex = points.findIndex((p) => p.week === report.current_week);
      if (nowIndex >= 0) {
        const bandHalf = Math.max(xStep / 2, 8);
        parts += `<rect class="chart-now" x="${x(nowIndex) - bandHalf}" y="${top}" width="${bandHalf * 2}" height="${height - padY - top}" />`;
      }

      const goalY = y(report.weekly_goal);
      parts += `<line class="chart-goal" x1="${padX}" y1="${goalY}" x2="${width - padX}" y2="${goalY}" />`;

      const path = points
        .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(1)} ${y(p.total).toFixed(1)}`)
        .join(' ');
      parts += `<path class="chart-line" d="${path}" />`;
      parts += points
        .map((p, i) => `<circle class="chart-point" cx="${x(i)}" cy="${y(p.total)}" r="3.5" />`)
        .join('');

      const labelEvery = points.length > 10 ? 2 : 1;
      parts += points
        .map((p, i) => {
          if (i % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(i)}" y="${height - padY + 18}" text-anchor="middle">W${p.week}</text>`;
        })
        .join('');

      chartEl.innerHTML = parts;
    };

    const renderProducts = (products) => {
      if (!products.length) {
        productsEl.innerHTML = '<p class="gauge-sub">No won sales in the period yet.</p>';
        return;
      }
      productsEl.innerHTML = products
        .map(
          (p) => `
            <div class="tile">
              <span class="label">${p.name} (${p.count})</span>
              <span class="value">${formatKr(p.total)}</span>
            </div>`
        )
        .join('');
    };

    const renderReport = (report) => {
      renderChart(report);
      renderGauge(report.percent);
      renderProducts(report.products);

      document.getElementById('tile-total').textContent = formatKr(report.total);
      document.getElementById('tile-weekly-goal').textContent = formatKr(report.weekly_goal);
      document.getElementById('tile-remaining').textContent = formatKr(report.remaining_weekly_target);

      const hits = report.hit_rate;
      document.getElementById('tile-hit-rate').textContent =
        `${(hits.rate * 100).toFixed(0)}% (${hits.won}/${hits.won + hits.offered + hits.rejected})`;

      progressCaption.textContent = `${formatKr(report.total)} / ${formatKr(report.goal_amount)}`;
      progressFill.style.width = `${Math.min(report.percent * 100, 100)}%`;
    };

    const refresh = async () => {
      try {
        const res = await fetch('/api/report');
        if (!res.ok) {
          throw new Error(await res.text() || 'Unable to load report');
        }
        renderReport(await res.json());
        setStatus('', '');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    refresh();
    setInterval(refresh, REFRESH_MS);
  </script>
</body>
</html>
"#;
