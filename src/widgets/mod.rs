crate::using! {
    pub app_cell,
    pub artwork,
    pub grid,
    pub loading,
    pub search_bar,
}
