//! Companion page served at `/`

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SheetBridge</title>
    <style>
        * { box-sizing: border-box; }
        body { font-family: system-ui, -apple-system, sans-serif; margin: 0; background: #f5f6f8; color: #1f2328; }
        header { background: #1f6f43; color: #fff; padding: 16px 24px; }
        header h1 { margin: 0; font-size: 20px; }
        main { max-width: 880px; margin: 0 auto; padding: 24px; }
        section { background: #fff; border: 1px solid #d0d7de; border-radius: 8px; padding: 16px; margin-bottom: 16px; }
        h2 { font-size: 16px; margin: 0 0 12px; }
        button, .button { background: #1f6f43; color: #fff; border: 0; border-radius: 6px; padding: 8px 14px; cursor: pointer; font-size: 14px; text-decoration: none; display: inline-block; }
        button:disabled { opacity: 0.6; cursor: wait; }
        textarea { width: 100%; min-height: 80px; padding: 8px; font: inherit; border: 1px solid #d0d7de; border-radius: 6px; }
        .row { display: flex; gap: 8px; align-items: center; flex-wrap: wrap; }
        .status { font-size: 13px; color: #57606a; margin-top: 8px; }
        .entry { border-top: 1px solid #eaeef2; padding: 12px 0; }
        .entry:first-child { border-top: 0; }
        .prompt { font-weight: 600; margin-bottom: 6px; }
        pre { background: #f6f8fa; padding: 8px; border-radius: 6px; overflow-x: auto; margin: 0; font-size: 13px; }
        .error pre { background: #fff1f0; }
    </style>
</head>
<body>
    <header><h1>SheetBridge</h1></header>
    <main>
        <section>
            <h2>Workbook</h2>
            <div class="row">
                <button id="create">Create blank workbook</button>
                <input type="file" id="upload-file" accept=".xlsx">
                <button id="upload">Upload</button>
                <a class="button" href="/workbook">Download</a>
            </div>
            <div class="status" id="workbook-status"></div>
        </section>

        <section>
            <h2>Prompt</h2>
            <textarea id="prompt" placeholder="e.g. Create a sheet called Finance and put Revenue in A1"></textarea>
            <div class="row" style="margin-top: 8px;">
                <button id="send">Send</button>
            </div>
        </section>

        <section>
            <h2>History</h2>
            <div id="history"><div class="status">No prompts yet.</div></div>
        </section>
    </main>

    <script>
        const history = [];

        function setStatus(text) {
            document.getElementById('workbook-status').textContent = text;
        }

        function escapeHtml(text) {
            const div = document.createElement('div');
            div.textContent = text;
            return div.innerHTML;
        }

        function renderHistory() {
            const container = document.getElementById('history');
            if (history.length === 0) {
                container.innerHTML = '<div class="status">No prompts yet.</div>';
                return;
            }
            container.innerHTML = history.map(item => `
                <div class="entry ${item.failed ? 'error' : ''}">
                    <div class="prompt">${escapeHtml(item.prompt)}</div>
                    <pre>${escapeHtml(JSON.stringify(item.result, null, 2))}</pre>
                </div>
            `).join('');
        }

        async function createWorkbook() {
            try {
                const res = await fetch('/workbook', { method: 'POST' });
                const body = await res.json();
                setStatus(body.message || body.error);
            } catch (e) {
                setStatus('Failed to create workbook: ' + e);
            }
        }

        async function uploadWorkbook() {
            const file = document.getElementById('upload-file').files[0];
            if (!file) {
                setStatus('Choose an .xlsx file first.');
                return;
            }
            try {
                const res = await fetch('/workbook', { method: 'PUT', body: file });
                const body = await res.json();
                setStatus(body.message || body.error);
            } catch (e) {
                setStatus('Upload failed: ' + e);
            }
        }

        async function sendPrompt() {
            const input = document.getElementById('prompt');
            const prompt = input.value.trim();
            if (!prompt) return;

            const button = document.getElementById('send');
            button.disabled = true;
            let result;
            let failed = false;
            try {
                const res = await fetch('/ask', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ prompt })
                });
                result = await res.json();
                failed = !res.ok || 'error' in result;
            } catch (e) {
                result = { error: String(e) };
                failed = true;
            }
            button.disabled = false;

            history.unshift({ prompt, result, failed });
            input.value = '';
            renderHistory();
        }

        document.getElementById('create').addEventListener('click', createWorkbook);
        document.getElementById('upload').addEventListener('click', uploadWorkbook);
        document.getElementById('send').addEventListener('click', sendPrompt);
        document.getElementById('prompt').addEventListener('keydown', e => {
            if (e.key === 'Enter' && (e.ctrlKey || e.metaKey)) sendPrompt();
        });
    </script>
</body>
</html>
"#;
