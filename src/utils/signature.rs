pub fn get_signature(version: &str) -> String {
    format!(
        r#"
   .----------.
   | [=] [=]  |             Addon Manager
   | [=] [=]  |             Reorder, rename and prune your Stremio addons.
   '----------'
                            v{}
"#,
        version
    )
}
