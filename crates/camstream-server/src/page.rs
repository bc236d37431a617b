//! Static status page served at `/`.

/// Render the index page.
///
/// The stream lives on its own listener one port above the page, so the
/// `<img>` source is rebuilt client-side from the page's hostname and the
/// stream port instead of a relative path.
pub fn index_html(stream_port: u16) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>ESP32-CAM Stream</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body {{
            font-family: Arial, sans-serif;
            background: #181818;
            color: #EFEFEF;
            text-align: center;
            margin: 0;
            padding: 20px;
        }}
        h1 {{ color: #03A9F4; }}
        img {{
            max-width: 100%;
            height: auto;
            border: 2px solid #03A9F4;
            border-radius: 10px;
        }}
        .button {{
            background-color: #03A9F4;
            border: none;
            color: white;
            padding: 12px 24px;
            font-size: 16px;
            margin: 10px;
            cursor: pointer;
            border-radius: 5px;
        }}
        .button:hover {{ background-color: #0288D1; }}
        .controls {{ margin-top: 20px; }}
    </style>
</head>
<body>
    <h1>ESP32-CAM Web Server</h1>
    <img id="stream" alt="camera stream">
    <div class="controls">
        <button class="button" onclick="toggleFlash()">Toggle Flash</button>
        <button class="button" onclick="capturePhoto()">Capture Photo</button>
    </div>
    <script>
        document.getElementById('stream').src =
            'http://' + window.location.hostname + ':{stream_port}/stream';
        function toggleFlash() {{
            fetch('/flash');
        }}
        function capturePhoto() {{
            window.open('/capture', '_blank');
        }}
    </script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_points_the_viewer_at_the_stream_listener() {
        let page = index_html(8081);
        assert!(page.contains(":8081/stream"));
        assert!(page.contains("/flash"));
        assert!(page.contains("/capture"));
    }
}
