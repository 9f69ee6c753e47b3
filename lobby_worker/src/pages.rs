//! Inline pages. The wasm bundle (`wasm-pack build client_wasm --target web`)
//! is served from static assets next to them.

pub const SCREEN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pong</title>
    <style>
        body { margin: 0; min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; background: #111; color: #fff; font-family: monospace; }
        #canvas { border: 2px solid #444; background: #000; }
        #qr-panel { text-align: center; }
        #qr-image { width: 240px; height: 240px; background: #fff; }
        #status { margin: 16px; font-size: 18px; }
        .hidden { display: none !important; }
    </style>
</head>
<body>
    <div id="qr-panel">
        <h1>PONG</h1>
        <img id="qr-image" alt="Scan to join">
        <p id="qr-url"></p>
    </div>
    <canvas id="canvas" class="hidden" width="800" height="600"></canvas>
    <div id="status">Loading...</div>
    <script type="module">
        import init, { start_screen } from './client_wasm.js';
        await init();
        start_screen('canvas');
    </script>
</body>
</html>"#;

pub const CONTROLLER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0, user-scalable=no">
    <title>Pong Controller</title>
    <style>
        body { margin: 0; min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; background: #111; color: #fff; font-family: monospace; user-select: none; }
        button { margin: 8px; padding: 16px 24px; font-family: monospace; font-size: 18px; border: none; border-radius: 8px; background: #4a9eff; color: #fff; }
        #panel-pad button { width: 40vw; height: 40vh; font-size: 48px; }
        #status { margin: 16px; font-size: 18px; }
        .hidden { display: none !important; }
    </style>
</head>
<body>
    <div id="status">Connecting...</div>
    <div id="panel-mode" class="hidden">
        <button id="btn-vs-ai">Play vs Computer</button>
        <button id="btn-wait-opponent">Wait for a friend</button>
    </div>
    <div id="panel-waiting" class="hidden">
        <p>Ask a friend to scan the QR code</p>
        <button id="btn-vs-ai-later">Play vs Computer instead</button>
    </div>
    <div id="panel-pad" class="hidden">
        <button id="btn-left">&#9664;</button>
        <button id="btn-right">&#9654;</button>
    </div>
    <div id="panel-over" class="hidden">
        <button id="btn-play-again">Play again</button>
        <button id="btn-wait-players">Wait for players</button>
        <button id="btn-exit">Exit</button>
    </div>
    <div id="panel-rejected" class="hidden">
        <p>Try again when the current game is over.</p>
    </div>
    <script type="module">
        import init, { start_controller } from './client_wasm.js';
        await init();
        start_controller();
    </script>
</body>
</html>"#;
