//! The operation catalogue.
//!
//! A closed enumeration of every native operation the embedded runtime may
//! invoke, shared by both processes: the child registers one global JS
//! function per entry, the host dispatches on it exhaustively. Names are
//! case-sensitive and matched exactly; each carries a stable numeric id.
//! An unlisted name never reaches a handler - the dispatcher produces an
//! empty result for it (see the dispatcher's reply rule).

/// Every native operation reachable from the embedded runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    // Panels
    QueryPanels,
    PanelNewBrowserPanel,
    PanelSetUrl,
    PanelExecuteJavascript,
    PanelSetArea,
    PanelResize,
    PanelSetTitle,
    PanelToggleVisibility,
    PanelDestroy,
    // Main window
    GetMainWindowGeometry,
    ToggleUserInput,
    // Files
    DownloadZip,
    ReadFile,
    DeleteFiles,
    DropFolder,
    QueryDownloadsFolder,
    // Media sources
    SourceCreate,
    SourceDestroy,
    // Stream settings
    GetStreamSettings,
    SetStreamSettings,
}

impl ApiMethod {
    /// All operations, in id order. The child derives its global JS function
    /// list from this.
    pub const ALL: [ApiMethod; 20] = [
        ApiMethod::QueryPanels,
        ApiMethod::PanelNewBrowserPanel,
        ApiMethod::PanelSetUrl,
        ApiMethod::PanelExecuteJavascript,
        ApiMethod::PanelSetArea,
        ApiMethod::PanelResize,
        ApiMethod::PanelSetTitle,
        ApiMethod::PanelToggleVisibility,
        ApiMethod::PanelDestroy,
        ApiMethod::GetMainWindowGeometry,
        ApiMethod::ToggleUserInput,
        ApiMethod::DownloadZip,
        ApiMethod::ReadFile,
        ApiMethod::DeleteFiles,
        ApiMethod::DropFolder,
        ApiMethod::QueryDownloadsFolder,
        ApiMethod::SourceCreate,
        ApiMethod::SourceDestroy,
        ApiMethod::GetStreamSettings,
        ApiMethod::SetStreamSettings,
    ];

    /// The wire-visible operation name.
    pub fn name(self) -> &'static str {
        match self {
            ApiMethod::QueryPanels => "JS_QUERY_PANELS",
            ApiMethod::PanelNewBrowserPanel => "JS_PANEL_NEW_BROWSER_PANEL",
            ApiMethod::PanelSetUrl => "JS_PANEL_SETURL",
            ApiMethod::PanelExecuteJavascript => "JS_PANEL_EXECUTEJAVASCRIPT",
            ApiMethod::PanelSetArea => "JS_PANEL_SETAREA",
            ApiMethod::PanelResize => "JS_PANEL_RESIZE",
            ApiMethod::PanelSetTitle => "JS_PANEL_SETTITLE",
            ApiMethod::PanelToggleVisibility => "JS_PANEL_TOGGLE_VISIBILITY",
            ApiMethod::PanelDestroy => "JS_PANEL_DESTROY",
            ApiMethod::GetMainWindowGeometry => "JS_GET_MAIN_WINDOW_GEOMETRY",
            ApiMethod::ToggleUserInput => "JS_TOGGLE_USER_INPUT",
            ApiMethod::DownloadZip => "JS_DOWNLOAD_ZIP",
            ApiMethod::ReadFile => "JS_READ_FILE",
            ApiMethod::DeleteFiles => "JS_DELETE_FILES",
            ApiMethod::DropFolder => "JS_DROP_FOLDER",
            ApiMethod::QueryDownloadsFolder => "JS_QUERY_DOWNLOADS_FOLDER",
            ApiMethod::SourceCreate => "JS_SOURCE_CREATE",
            ApiMethod::SourceDestroy => "JS_SOURCE_DESTROY",
            ApiMethod::GetStreamSettings => "JS_GET_STREAM_SETTINGS",
            ApiMethod::SetStreamSettings => "JS_SET_STREAM_SETTINGS",
        }
    }

    /// Stable numeric identifier.
    pub fn id(self) -> u32 {
        match self {
            ApiMethod::QueryPanels => 1,
            ApiMethod::PanelNewBrowserPanel => 2,
            ApiMethod::PanelSetUrl => 3,
            ApiMethod::PanelExecuteJavascript => 4,
            ApiMethod::PanelSetArea => 5,
            ApiMethod::PanelResize => 6,
            ApiMethod::PanelSetTitle => 7,
            ApiMethod::PanelToggleVisibility => 8,
            ApiMethod::PanelDestroy => 9,
            ApiMethod::GetMainWindowGeometry => 10,
            ApiMethod::ToggleUserInput => 11,
            ApiMethod::DownloadZip => 12,
            ApiMethod::ReadFile => 13,
            ApiMethod::DeleteFiles => 14,
            ApiMethod::DropFolder => 15,
            ApiMethod::QueryDownloadsFolder => 16,
            ApiMethod::SourceCreate => 17,
            ApiMethod::SourceDestroy => 18,
            ApiMethod::GetStreamSettings => 19,
            ApiMethod::SetStreamSettings => 20,
        }
    }

    /// Exact-match, case-sensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }
}
