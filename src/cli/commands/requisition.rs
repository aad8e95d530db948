use ledgerdesk_core::RequisitionService;
use ledgerdesk_domain::{
    AdvanceRequest, ApproveInvoiceRequest, CreateInvoiceRequest, PaymentRequisition,
    RequisitionStatus,
};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{date, money};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "requisition <list [--status S]|show <id>|advance <id> --amount N|invoice <id> --number X --amount N|approve <id> [--remarks R]>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "requisition",
        "Vendor payment workflow from purchase order to payment",
        USAGE,
        cmd_requisition,
    )
    .with_actions(&["list", "show", "advance", "invoice", "approve"])]
}

fn cmd_requisition(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "list" => list_requisitions(context, &args),
        "show" => show_requisition(context, &args),
        "advance" => create_advance(context, &args),
        "invoice" => create_invoice(context, &args),
        "approve" => approve_invoice(context, &args),
        other => Err(unknown_action("requisition", other)),
    }
}

fn actions_label(requisition: &PaymentRequisition) -> String {
    RequisitionService::available_actions(requisition)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_requisitions(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let status = args
        .get("status")
        .map(|raw| {
            RequisitionStatus::parse(raw).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown status `{}` (po, grn, invoice-created, approved, paid)",
                    raw
                ))
            })
        })
        .transpose()?;
    let requisitions = context.api.payment_requisitions(company_id)?;
    let rows: Vec<&PaymentRequisition> = match status {
        Some(status) => RequisitionService::by_status(&requisitions, status),
        None => requisitions.iter().collect(),
    };
    if rows.is_empty() {
        io::print_info("No requisitions match.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("PO"),
        TableColumn::left("Vendor").max(28),
        TableColumn::right("PO amount"),
        TableColumn::right("Advanced"),
        TableColumn::right("Payable"),
        TableColumn::left("Status"),
        TableColumn::left("Next steps").max(40),
    ]);
    for requisition in rows {
        table.push([
            requisition.id.to_string(),
            requisition.purchase_order.po_number.clone(),
            requisition.purchase_order.vendor_name.clone(),
            money(requisition.purchase_order.amount),
            money(requisition.advanced_total()),
            money(RequisitionService::payable_amount(requisition)),
            requisition.status.to_string(),
            actions_label(requisition),
        ]);
    }
    block(&table.render());
    Ok(())
}

fn show_requisition(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "requisition show <id>")?;
    let company_id = context.company(args)?;
    let requisition = context.api.requisition(company_id, id)?;
    let pattern = context.date_format();
    let order = &requisition.purchase_order;

    output_section(format!("Requisition {} ({})", requisition.id, requisition.status));
    io::print_info(format!(
        "  Purchase order : {} dated {}",
        order.po_number,
        date(order.date, pattern)
    ));
    io::print_info(format!("  Vendor         : {}", order.vendor_name));
    io::print_info(format!("  Amount         : {}", money(order.amount)));
    for advance in &requisition.advances {
        io::print_info(format!(
            "  Advance        : {} on {}",
            money(advance.amount),
            date(advance.date, pattern)
        ));
    }
    if let Some(invoice) = &requisition.invoice {
        let approval = match invoice.approved_on {
            Some(on) => format!(", approved {}", date(on, pattern)),
            None => String::new(),
        };
        io::print_info(format!(
            "  Invoice        : {} for {}{}",
            invoice.invoice_number,
            money(invoice.amount),
            approval
        ));
    }
    io::print_info(format!(
        "  Payable        : {}",
        money(RequisitionService::payable_amount(&requisition))
    ));
    let actions = actions_label(&requisition);
    if !actions.is_empty() {
        io::print_hint(format!("Next: {}", actions));
    }
    Ok(())
}

fn create_advance(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "requisition advance <id> --amount N")?;
    let company_id = context.company(args)?;
    let requisition = context.api.requisition(company_id, id)?;
    let amount = match args.decimal("amount")? {
        Some(amount) => amount,
        None => {
            return Err(CommandError::InvalidArguments(format!(
                "missing `--amount`; up to {} can be advanced",
                money(RequisitionService::advance_headroom(&requisition))
            )))
        }
    };
    let request = AdvanceRequest {
        requisition_id: id,
        amount,
        date: args.date("date")?.unwrap_or_else(|| context.today()),
        notes: args.string("notes"),
    };
    context.api.create_advance(&requisition, &request)?;
    io::print_success(format!(
        "Advance of {} recorded against {}.",
        money(amount),
        requisition.purchase_order.po_number
    ));
    Ok(())
}

fn create_invoice(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "requisition invoice <id> --number X --amount N")?;
    let company_id = context.company(args)?;
    let requisition = context.api.requisition(company_id, id)?;
    let request = CreateInvoiceRequest {
        requisition_id: id,
        invoice_number: args.require("number")?.to_string(),
        invoice_date: args.date("date")?.unwrap_or_else(|| context.today()),
        amount: args.required("amount", "an amount")?,
    };
    context.api.create_invoice(&requisition, &request)?;
    io::print_success(format!(
        "Invoice {} created; the requisition is now {}.",
        request.invoice_number,
        RequisitionStatus::InvoiceCreated
    ));
    Ok(())
}

fn approve_invoice(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "requisition approve <id> [--remarks R]")?;
    let company_id = context.company(args)?;
    let requisition = context.api.requisition(company_id, id)?;
    let user = context.require_user()?;
    let request = ApproveInvoiceRequest {
        requisition_id: id,
        invoice_id: requisition.invoice.as_ref().and_then(|invoice| invoice.id),
        approved_by: user.id,
        remarks: args.string("remarks"),
    };
    if !context.confirm(&format!("Approve the invoice on requisition {}?", id))? {
        io::print_info("Nothing approved.");
        return Ok(());
    }
    context.api.approve_invoice(&requisition, &request)?;
    io::print_success(format!(
        "Invoice approved. {} is payable.",
        money(RequisitionService::payable_amount(&requisition))
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ledgerdesk_core::Method;

    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    const LIST: &str = "/api/vendor-payment/getAllPaymentRequisition";

    fn requisition(status: &str) -> serde_json::Value {
        json!([{
            "id": 12, "companyId": 1, "status": status,
            "purchaseOrder": { "id": 3, "poNumber": "PO-0003", "vendorId": 7, "vendorName": "Globex",
                               "amount": "1000.00", "date": "2024-03-01" },
            "advances": [{ "amount": "250.00", "date": "2024-03-05" }],
            "invoice": { "id": 44, "invoiceNumber": "INV-9", "invoiceDate": "2024-03-20", "amount": "1000.00" }
        }])
    }

    #[test]
    fn advance_beyond_the_purchase_order_is_refused() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, LIST, requisition("PURCHASE_ORDER"));
        process_script(&mut context, &["requisition advance 12 --amount 800 --date 2024-03-10"])
            .expect("script");
        assert!(fixture
            .sent_to(Method::Post, "/api/vendor-payment/createAdvance")
            .is_empty());
    }

    #[test]
    fn invoice_requires_a_completed_grn() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, LIST, requisition("PURCHASE_ORDER"));
        process_script(
            &mut context,
            &["requisition invoice 12 --number INV-10 --amount 1000 --date 2024-03-20"],
        )
        .expect("script");
        assert!(fixture
            .sent_to(Method::Post, "/api/vendor-payment/createInvoice")
            .is_empty());
    }

    #[test]
    fn approve_sends_the_approver_and_invoice() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, LIST, requisition("INVOICE_CREATED"))
            .respond(
                Method::Post,
                "/api/vendor-payment/approveInvoice",
                json!({ "success": true }),
            );
        process_script(&mut context, &["requisition approve 12 --remarks ok"]).expect("script");

        let sent = fixture.sent_to(Method::Post, "/api/vendor-payment/approveInvoice");
        assert_eq!(sent.len(), 1);
        let body = sent[0].body.as_ref().expect("body");
        assert_eq!(body["approvedBy"], 42);
        assert_eq!(body["invoiceId"], 44);
        assert_eq!(body["requisitionId"], 12);
    }

    #[test]
    fn list_filters_by_status() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, LIST, requisition("GRN_COMPLETED"));
        process_script(&mut context, &["requisition list --status paid", "requisition list --status grn"])
            .expect("script");
        assert_eq!(fixture.sent_to(Method::Get, LIST).len(), 2);
    }
}
