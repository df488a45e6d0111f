//! Style rules for the dashboard and login pages.
//!
//! Embedded in the binary; pages carry no external assets.

pub const DASHBOARD_CSS: &str = r#"
:root {
  --bg: #121212;
  --surface: #1e1e1e;
  --border: #333;
  --text: #f5f5f5;
  --muted: #7f8c8d;
  --accent: #0097e6;
  --green: #2ecc71;
  --orange: #f39c12;
  --red: #e74c3c;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app {
  display: grid;
  grid-template-columns: 280px 1fr;
  gap: 24px;
  max-width: 1400px;
  margin: 0 auto;
  padding: 24px;
}
.sidebar, .data-box, .graph-box {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
}
.boxes {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
  gap: 24px;
  margin-bottom: 24px;
}
.graph-box { overflow-x: auto; }
h2, h3 { color: var(--accent); margin-bottom: 12px; }
h4 { margin: 16px 0 8px; }
ul { list-style: none; }

/* Sidebar */
.user-profile p {
  margin: 10px 0;
  border-bottom: 1px solid var(--border);
  padding-bottom: 8px;
}
.avatar {
  width: 100px;
  height: 100px;
  border-radius: 50%;
  margin: 10px auto;
  display: block;
  border: 3px solid var(--accent);
}
.user-name { font-size: 1.2em; font-weight: bold; color: var(--accent); }
.user-total-xp { color: var(--green); font-weight: bold; }
.logout-btn {
  width: 100%;
  margin-top: 16px;
  padding: 10px;
  background: var(--red);
  color: #fff;
  border: none;
  border-radius: var(--radius);
  cursor: pointer;
}

/* Panels */
.monthly-breakdown li, .recent-activity li, .project-item, .audit-item {
  display: flex;
  justify-content: space-between;
  margin-bottom: 8px;
  padding-bottom: 8px;
  border-bottom: 1px solid var(--border);
}
.activity-entry { display: flex; flex-direction: column; width: 100%; }
.activity-name, .project-name { font-weight: bold; color: var(--accent); }
.activity-xp { color: var(--green); }
.activity-date, .project-date, .audit-date { font-size: 0.8em; color: var(--muted); }
.total-xp {
  font-size: 1.2em;
  margin-bottom: 20px;
  padding-bottom: 10px;
  border-bottom: 2px solid var(--accent);
}
.summary-item { display: flex; justify-content: space-between; margin: 6px 0; }
.summary-value { font-weight: bold; }
.project-grade { display: flex; flex-direction: column; align-items: flex-end; }
.project-status { font-size: 0.8em; }

/* Donut */
.chart-container { display: flex; align-items: center; gap: 16px; margin-bottom: 16px; }
.donut-text { font-size: 24px; font-weight: bold; fill: var(--text); }
.donut-subtext { font-size: 12px; fill: var(--muted); }
.legend-item { display: flex; align-items: center; gap: 8px; margin: 4px 0; }
.legend-color { width: 12px; height: 12px; border-radius: 2px; display: inline-block; }

/* Audit bars */
.ratio-value { font-size: 1.2em; }
.ratio-message { color: var(--muted); margin: 8px 0 16px; }
.ratio-bar {
  height: 12px;
  background: var(--border);
  border-radius: 6px;
  overflow: hidden;
  margin: 4px 0 12px;
}
.ratio-fill { height: 100%; background: var(--accent); }

/* Line chart */
.line-chart { overflow: visible; }
.graph-box text { font-size: 12px; font-family: sans-serif; }
.graph-box circle:hover { r: 6; fill: var(--red); cursor: pointer; }

/* Login */
.login {
  max-width: 360px;
  margin: 120px auto;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 32px;
}
.login input {
  width: 100%;
  margin: 8px 0 16px;
  padding: 10px;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: var(--radius);
}
.login button {
  width: 100%;
  padding: 10px;
  background: var(--accent);
  color: #fff;
  border: none;
  border-radius: var(--radius);
  cursor: pointer;
}
.error-message { color: var(--red); margin-bottom: 12px; }
"#;
