//! The per-category totals panel, fed by the summary endpoint.

use common::{CategorySummary, TOTAL_CATEGORY};
use yew::{function_component, html, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct SummaryPanelProps {
    pub summary: Vec<CategorySummary>,
}

#[function_component]
pub fn SummaryPanel(props: &SummaryPanelProps) -> Html {
    html! {
        <div class="summary-panel">
            <h2>{"Totals"}</h2>
            <table class="summary-table">
                <thead>
                    <tr>
                        <th>{"Category"}</th>
                        <th>{"Count"}</th>
                        <th>{"Total"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for props.summary.iter().map(|row| {
                        let class = (row.category == TOTAL_CATEGORY).then_some("summary-total");
                        html! {
                            <tr class={class} key={row.category.clone()}>
                                <td>{&row.category}</td>
                                <td>{row.total_count}</td>
                                <td>{format!("${:.2}", row.category_total)}</td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        </div>
    }
}
