//! Static page shell around the rendered repository list

use super::escape_html;

const STYLE: &str = r#"
:root {
  --dark: rgb(29, 29, 29);
  --dark-hover: #292929;
  --light: #dbdbdb;
  --light-hover: #efefef;
}

* {
  padding: 0;
  border: none;
  font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, 'Open Sans', 'Helvetica Neue', sans-serif;
  text-decoration: none;
  list-style: none;
}

body {
  margin: 5%;
}

.row {
  display: flex;
  justify-content: space-between;
}

.row > div:nth-of-type(2) {
  text-align: right;
}

@media (prefers-color-scheme: dark) {
  * {
    background: var(--dark);
    color: var(--light);
  }

  li:hover {
    background: var(--dark-hover);
  }

  li:hover > * {
    background: inherit;
  }
}

@media (prefers-color-scheme: light) {
  * {
    background: var(--light);
    color: var(--dark);
  }

  li:hover {
    background: var(--light-hover);
  }

  li:hover > * {
    background: inherit;
  }
}

li {
  display: block;
  padding: 5px;
}

h1 {
  margin: 0;
}

h1:last-of-type {
  margin-bottom: 40px;
}
"#;

/// Wrap `body` (already HTML) in the page shell
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta http-equiv="X-UA-Compatible" content="IE=edge">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}
