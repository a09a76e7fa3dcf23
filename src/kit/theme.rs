// Colour theme shared by the Dataview widgets

/// Custom properties declared on the app root and inherited by every
/// nested component root
pub const HOST_VARIABLES: &str = r#"
  :host {
    --soft-mist: #F6F6F6;
    --stone-gray: #B8B8B8;
    --silver-dust: #DCDCDC;
    --blue: #2E4EFF;
    --black: #000;
    --white: #fff;
    --raspberry-punch: #FF3277;
    --amber-flame: #FEB40E;
    --screen-lg: 1280px;
    --screen-xl: 1480px;
    --screen-2xl: 1680px;
    font-family: Roboto;
  }
"#;

/// Bar colours, picked per record key
pub const PALETTE: [&str; 24] = [
    "#FF6B6B", "#FF8E72", "#FFA94D", "#FFC300", "#FFD700", "#FFF700", "#A7F432", "#32CD32",
    "#00FA9A", "#00CED1", "#00BFFF", "#1E90FF", "#4169E1", "#6A5ACD", "#8A2BE2", "#9400D3",
    "#9932CC", "#C71585", "#FF1493", "#FF69B4", "#FF6EB4", "#FF83FA", "#FFA07A", "#FF4500",
];
