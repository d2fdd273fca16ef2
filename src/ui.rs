use crate::feedback::Feedback;
use crate::plan::{self, DayPlan};

pub fn render_index(plan: &DayPlan, feedback: &Feedback) -> String {
    let options = plan::day_names()
        .into_iter()
        .map(|day| {
            let selected = if day == plan.day { " selected" } else { "" };
            format!(r#"<option value="{day}"{selected}>{day}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("");

    INDEX_HTML
        .replace("{{DAY}}", plan.day)
        .replace("{{OPTIONS}}", &options)
        .replace("{{FEEDBACK}}", &feedback.message)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Treadmill Coach</title>
  <style>
    :root {
      --bg-1: #eef3f6;
      --ink: #1f2a30;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --muted: #6b7780;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 18px 44px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg-1), #dfe9ef 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 28px 16px 48px;
    }

    .app {
      width: min(860px, 100%);
      display: grid;
      gap: 18px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
    }

    select,
    button {
      font: inherit;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 8px 14px;
      background: white;
      cursor: pointer;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 18px 20px;
      display: grid;
      gap: 8px;
    }

    .cardTitle {
      font-weight: 600;
      color: var(--accent-2);
      text-transform: uppercase;
      letter-spacing: 0.08em;
      font-size: 0.85rem;
    }

    .muted {
      color: var(--muted);
    }

    .setRow,
    .mobItem {
      display: grid;
      grid-template-columns: 1.6fr 0.6fr 0.5fr 0.8fr auto;
      gap: 10px;
      align-items: center;
      padding: 8px 0;
      border-top: 1px solid rgba(47, 72, 88, 0.08);
    }

    .speed {
      font-weight: 600;
      color: var(--accent);
    }

    .clock {
      font-variant-numeric: tabular-nums;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
      color: var(--accent-2);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1 id="dayTitle">{{DAY}}</h1>
      <select id="daySelect">{{OPTIONS}}</select>
    </header>

    <section class="card">
      <div class="cardTitle">Weekly Feedback</div>
      <div class="muted" id="feedback">{{FEEDBACK}}</div>
    </section>

    <section class="card">
      <div class="cardTitle" id="dayKind"></div>
      <div class="muted" id="dayExplain"></div>
    </section>

    <section class="card">
      <div class="cardTitle">Warm-up</div>
      <ul id="warmupList"></ul>
    </section>

    <section class="card">
      <div class="cardTitle">Main set</div>
      <div id="mainBlock"></div>
    </section>

    <section class="card">
      <div class="cardTitle">Mobility</div>
      <div id="mobilityList"></div>
    </section>

    <div class="status" id="status" role="status"></div>
  </main>

  <script>
    const daySelect = document.getElementById('daySelect');
    const statusEl = document.getElementById('status');
    const clocks = new Map();
    const buttons = new Map();
    let currentDay = '{{DAY}}';

    const setStatus = (message) => {
      statusEl.textContent = message;
    };

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body ? JSON.stringify(body) : undefined
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const timerControl = (kind, index, label) => {
      const clock = document.createElement('div');
      clock.className = 'clock';
      clock.textContent = label;
      const button = document.createElement('button');
      button.textContent = 'Start';
      const key = `${currentDay}_${kind}_${index}`;
      clocks.set(key, clock);
      buttons.set(key, button);
      button.addEventListener('click', () => {
        post('/api/timers/toggle', { day: currentDay, kind, index })
          .then(updateTimer)
          .catch((err) => setStatus(err.message));
      });
      return [clock, button];
    };

    const updateTimer = (view) => {
      const clock = clocks.get(view.key);
      const button = buttons.get(view.key);
      if (clock) {
        clock.textContent = view.display;
      }
      if (button) {
        button.textContent = view.state === 'running' ? 'Pause' : view.state === 'completed' ? 'Done' : 'Start';
      }
    };

    const renderDay = async (day) => {
      const res = await fetch(`/api/days/${encodeURIComponent(day)}`);
      if (!res.ok) {
        throw new Error('Unable to load day');
      }
      const data = await res.json();
      currentDay = data.day;
      clocks.clear();
      buttons.clear();

      document.getElementById('dayTitle').textContent = data.day;
      document.getElementById('dayKind').textContent = data.kind;
      document.getElementById('dayExplain').textContent = data.explain;
      document.getElementById('feedback').textContent = data.feedback.message;

      const warmup = document.getElementById('warmupList');
      warmup.innerHTML = '';
      data.warmup.forEach((line) => {
        const li = document.createElement('li');
        li.textContent = line;
        warmup.appendChild(li);
      });

      const main = document.getElementById('mainBlock');
      main.innerHTML = '';
      data.main.forEach((set) => {
        const row = document.createElement('div');
        row.className = 'setRow';
        const name = document.createElement('div');
        name.textContent = `${set.index + 1}. ${set.name}`;
        const speed = document.createElement('div');
        speed.className = 'speed';
        speed.textContent = set.speed_display;
        const reps = document.createElement('div');
        reps.textContent = `x${set.reps}`;
        row.append(name, speed, reps);

        if (set.rest > 0) {
          const [clock, button] = timerControl('rest', set.index, set.rest_display);
          const wrap = document.createElement('div');
          wrap.append(clock, button);
          row.appendChild(wrap);
        } else {
          row.appendChild(document.createElement('div'));
        }

        const done = document.createElement('input');
        done.type = 'checkbox';
        done.addEventListener('change', () => {
          if (!done.checked) {
            return;
          }
          const hit = confirm('Did you hit the target speed?');
          post('/api/outcome', { day: currentDay, index: set.index, hit })
            .then((result) => {
              speed.textContent = result.speed_display;
              document.getElementById('feedback').textContent = result.feedback.message;
              setStatus('Saved');
            })
            .catch((err) => setStatus(err.message));
        });
        row.appendChild(done);
        main.appendChild(row);
      });

      const mobility = document.getElementById('mobilityList');
      mobility.innerHTML = '';
      data.mobility.forEach((item) => {
        const row = document.createElement('div');
        row.className = 'mobItem';
        const name = document.createElement('div');
        name.textContent = item.name;
        const [clock, button] = timerControl('mobility', item.index, item.duration_display);
        const done = document.createElement('input');
        done.type = 'checkbox';
        row.append(name, clock, document.createElement('div'), button, done);
        mobility.appendChild(row);
      });
    };

    const poll = async () => {
      const res = await fetch('/api/timers');
      if (res.ok) {
        (await res.json()).forEach(updateTimer);
      }
      const { completed } = await post('/api/timers/completions');
      if (completed.length) {
        setStatus(`Time! ${completed.join(', ')} finished.`);
      }
    };

    daySelect.addEventListener('change', (event) => {
      renderDay(event.target.value).catch((err) => setStatus(err.message));
    });

    renderDay(currentDay).catch((err) => setStatus(err.message));
    setInterval(() => poll().catch((err) => setStatus(err.message)), 1000);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::weekly_feedback;

    #[test]
    fn index_marks_selected_day_and_feedback() {
        let plan = plan::find_day("Tuesday").unwrap();
        let html = render_index(plan, &weekly_feedback(&[], 12));
        assert!(html.contains(r#"<option value="Tuesday" selected>Tuesday</option>"#));
        assert!(html.contains("let currentDay = 'Tuesday';"));
        assert!(html.contains("Complete a few sessions"));
        assert!(!html.contains("{{"));
    }
}
