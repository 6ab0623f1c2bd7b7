//! The single-page chat widget

use crate::prompts::{
    APP_TITLE, CHAT_INPUT_PLACEHOLDER, DISCLAIMER, LOG_CONTENT_HEADING, LOG_SUMMARY_HEADING,
    UPLOAD_LABEL,
};

/// Render the page, accepting uploads with the given extensions
pub fn render_page(allowed_extensions: &[String]) -> String {
    let accept = allowed_extensions
        .iter()
        .map(|ext| format!(".{}", ext.trim_start_matches('.')))
        .collect::<Vec<_>>()
        .join(",");

    PAGE_HTML
        .replace("{{TITLE}}", APP_TITLE)
        .replace("{{PLACEHOLDER}}", CHAT_INPUT_PLACEHOLDER)
        .replace("{{UPLOAD_LABEL}}", UPLOAD_LABEL)
        .replace("{{CONTENT_HEADING}}", LOG_CONTENT_HEADING)
        .replace("{{SUMMARY_HEADING}}", LOG_SUMMARY_HEADING)
        .replace("{{DISCLAIMER}}", DISCLAIMER)
        .replace("{{ACCEPT}}", &accept)
}

const PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <style>
        :root {
            --bg: #f7f7f9;
            --card: #ffffff;
            --border: #dcdce3;
            --text: #1f2430;
            --muted: #6b7080;
            --user: #e8f0fe;
            --assistant: #f1f3f4;
            --error: #b3261e;
        }
        * { box-sizing: border-box; }
        body {
            font-family: -apple-system, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg);
            color: var(--text);
            margin: 0;
            padding: 24px;
        }
        .container { max-width: 860px; margin: 0 auto; }
        h1 { font-size: 1.8rem; margin: 0 0 20px; }
        h3 { margin: 16px 0 8px; }
        .card {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 10px;
            padding: 16px;
            margin-bottom: 16px;
        }
        #transcript { display: flex; flex-direction: column; gap: 10px; min-height: 80px; }
        .message { padding: 10px 14px; border-radius: 8px; white-space: pre-wrap; }
        .message .role { font-size: 0.75rem; color: var(--muted); text-transform: uppercase; }
        .message.user { background: var(--user); align-self: flex-end; }
        .message.assistant { background: var(--assistant); align-self: flex-start; }
        .error { color: var(--error); margin: 8px 0; }
        details pre { font-size: 0.8rem; white-space: pre-wrap; color: var(--muted); }
        form { display: flex; gap: 8px; }
        input[type=text] {
            flex: 1;
            padding: 10px;
            border: 1px solid var(--border);
            border-radius: 8px;
        }
        button { padding: 10px 16px; border: none; border-radius: 8px; cursor: pointer; }
        textarea { width: 100%; height: 200px; font-family: monospace; }
        footer { border-top: 1px solid var(--border); padding-top: 12px; color: var(--muted); }
        .hidden { display: none; }
    </style>
</head>
<body>
<div class="container">
    <h1>{{TITLE}}</h1>

    <div class="card">
        <label for="log-file">{{UPLOAD_LABEL}}</label>
        <input type="file" id="log-file" accept="{{ACCEPT}}">
        <div id="log-section" class="hidden">
            <h3>{{CONTENT_HEADING}}</h3>
            <textarea id="log-content" readonly></textarea>
            <div id="log-error"></div>
            <div id="log-summary-section" class="hidden">
                <h3>{{SUMMARY_HEADING}}</h3>
                <div id="log-summary" class="message assistant"></div>
            </div>
        </div>
    </div>

    <div class="card">
        <div id="transcript"></div>
        <div id="chat-error"></div>
    </div>

    <form id="chat-form">
        <input type="text" id="chat-input" placeholder="{{PLACEHOLDER}}" autocomplete="off">
        <button type="submit" id="send">Send</button>
    </form>

    <footer>
        <p>{{DISCLAIMER}}</p>
    </footer>
</div>
<script>
    let sessionId = null;
    let sessionPromise = null;

    function ensureSession() {
        if (!sessionPromise) {
            sessionPromise = fetch('/api/sessions', { method: 'POST' })
                .then((res) => res.json())
                .then((body) => {
                    sessionId = body.id;
                    return sessionId;
                })
                .catch((err) => {
                    sessionPromise = null;
                    throw err;
                });
        }
        return sessionPromise;
    }

    function resetSession() {
        sessionId = null;
        sessionPromise = null;
    }

    function renderTranscript(messages) {
        const el = document.getElementById('transcript');
        el.innerHTML = '';
        for (const msg of messages) {
            const div = document.createElement('div');
            div.className = 'message ' + msg.role;
            const role = document.createElement('div');
            role.className = 'role';
            role.textContent = msg.role;
            const content = document.createElement('div');
            content.textContent = msg.content;
            div.appendChild(role);
            div.appendChild(content);
            el.appendChild(div);
        }
    }

    function renderError(target, error, trace) {
        const el = document.getElementById(target);
        el.innerHTML = '';
        if (!error) return;
        const msg = document.createElement('div');
        msg.className = 'error';
        msg.textContent = error;
        el.appendChild(msg);
        if (trace) {
            const details = document.createElement('details');
            const summary = document.createElement('summary');
            summary.textContent = 'Details';
            const pre = document.createElement('pre');
            pre.textContent = trace;
            details.appendChild(summary);
            details.appendChild(pre);
            el.appendChild(details);
        }
    }

    document.getElementById('chat-form').addEventListener('submit', async (event) => {
        event.preventDefault();
        const input = document.getElementById('chat-input');
        const content = input.value;
        if (!content.trim()) return;
        input.value = '';
        const send = document.getElementById('send');
        send.disabled = true;
        try {
            const id = await ensureSession();
            const res = await fetch('/api/sessions/' + id + '/messages', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ content }),
            });
            const body = await res.json();
            if (!res.ok) {
                if (res.status === 404) resetSession();
                renderError('chat-error', body.error, null);
                return;
            }
            renderTranscript(body.messages);
            renderError('chat-error', body.error, body.trace);
        } finally {
            send.disabled = false;
        }
    });

    document.getElementById('log-file').addEventListener('change', async (event) => {
        const file = event.target.files[0];
        if (!file) return;
        document.getElementById('log-section').classList.remove('hidden');
        document.getElementById('log-summary-section').classList.add('hidden');
        document.getElementById('log-content').value = '';
        renderError('log-error', null, null);

        const res = await fetch('/api/logs?filename=' + encodeURIComponent(file.name), {
            method: 'POST',
            body: file,
        });
        const body = await res.json();
        if (!res.ok) {
            renderError('log-error', body.error, null);
            return;
        }
        document.getElementById('log-content').value = body.content;
        if (body.summary !== null && body.summary !== undefined) {
            document.getElementById('log-summary').textContent = body.summary;
            document.getElementById('log-summary-section').classList.remove('hidden');
        }
        renderError('log-error', body.error, body.trace);
    });

    window.addEventListener('pagehide', () => {
        if (!sessionId) return;
        fetch('/api/sessions/' + sessionId, { method: 'DELETE', keepalive: true });
        resetSession();
    });

    ensureSession();
</script>
</body>
</html>
"##;
