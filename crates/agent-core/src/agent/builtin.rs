//! Agent table used when no agent file is available.

use super::types::AgentSpec;

const BUILTIN_AGENTS: &[(&str, &str, &str)] = &[
    (
        "report_generator",
        "📋 510(k) Report Generator",
        "Generate a comprehensive FDA 510(k) submission report for {topic} based on the following guidance: {guidance_text}\n\n\
         Create a detailed report with proper sections, regulatory requirements, and technical specifications.",
    ),
    (
        "guideline_generator",
        "📖 Review Guideline Creator",
        "Create detailed review guidelines for the following 510(k) report: {mock_report}\n\n\
         Based on FDA guidance: {guidance_text}\n\n\
         Generate comprehensive review criteria and checkpoints.",
    ),
    (
        "review_generator",
        "🔍 Mock Review Generator",
        "Conduct a thorough FDA review of the following report: {mock_report}\n\n\
         Using these guidelines: {guideline}\n\n\
         Provide detailed feedback, deficiency letters, and recommendations.",
    ),
    (
        "document_modifier",
        "✏️ Document Editor",
        "Modify the following document based on the requested changes:\n\n\
         Document: {document}\n\n\
         Requested Changes: {edits}\n\n\
         Apply the modifications while maintaining document integrity and regulatory compliance.",
    ),
    (
        "risk_analyzer",
        "⚠️ Risk Assessment Specialist",
        "Analyze the risk profile of this medical device submission: {content}\n\n\
         Evaluate clinical risks, safety concerns, and mitigation strategies according to ISO 14971.",
    ),
    (
        "predicate_analyzer",
        "🔗 Predicate Device Analyst",
        "Analyze predicate device comparisons in this submission: {content}\n\n\
         Evaluate substantial equivalence claims and identify any gaps.",
    ),
    (
        "clinical_reviewer",
        "🩺 Clinical Data Reviewer",
        "Review clinical data and studies presented: {content}\n\n\
         Assess study design, endpoints, statistical analysis, and clinical significance.",
    ),
    (
        "biocompatibility_expert",
        "🧬 Biocompatibility Assessor",
        "Evaluate biocompatibility testing and data: {content}\n\n\
         Review according to ISO 10993 standards and FDA requirements.",
    ),
    (
        "software_validator",
        "💻 Software Validation Specialist",
        "Assess software validation documentation: {content}\n\n\
         Review according to FDA software guidance and IEC 62304.",
    ),
    (
        "labeling_reviewer",
        "🏷️ Labeling Compliance Expert",
        "Review device labeling for regulatory compliance: {content}\n\n\
         Check against FDA labeling requirements and 21 CFR 801.",
    ),
    (
        "quality_assessor",
        "✅ Quality System Auditor",
        "Evaluate quality management system documentation: {content}\n\n\
         Assess ISO 13485 compliance and manufacturing controls.",
    ),
    (
        "sterilization_expert",
        "🦠 Sterilization Validator",
        "Review sterilization validation data: {content}\n\n\
         Evaluate according to ISO 11135, 11137, or other relevant standards.",
    ),
    (
        "electromagnetic_specialist",
        "⚡ EMC/EMI Testing Expert",
        "Assess electromagnetic compatibility testing: {content}\n\n\
         Review IEC 60601-1-2 compliance and testing protocols.",
    ),
    (
        "cybersecurity_analyst",
        "🔒 Cybersecurity Assessor",
        "Evaluate cybersecurity documentation: {content}\n\n\
         Review according to FDA cybersecurity guidance and NIST framework.",
    ),
    (
        "usability_engineer",
        "👤 Human Factors Specialist",
        "Review usability and human factors engineering: {content}\n\n\
         Assess IEC 62366 compliance and use-related risk analysis.",
    ),
    (
        "packaging_validator",
        "📦 Packaging Validation Expert",
        "Evaluate packaging and shelf-life validation: {content}\n\n\
         Review ASTM and ISO packaging standards compliance.",
    ),
    (
        "mechanical_tester",
        "🔧 Mechanical Testing Reviewer",
        "Assess mechanical testing and performance data: {content}\n\n\
         Evaluate test protocols and acceptance criteria.",
    ),
    (
        "electrical_safety",
        "⚡ Electrical Safety Auditor",
        "Review electrical safety testing: {content}\n\n\
         Assess IEC 60601-1 compliance and safety standards.",
    ),
    (
        "materials_scientist",
        "🧪 Materials Characterization Expert",
        "Evaluate materials characterization data: {content}\n\n\
         Review material properties and testing methodologies.",
    ),
    (
        "shelf_life_analyst",
        "⏰ Shelf Life Validation Specialist",
        "Assess shelf life and stability data: {content}\n\n\
         Review accelerated aging and real-time stability studies.",
    ),
    (
        "comparison_specialist",
        "⚖️ Comparative Effectiveness Reviewer",
        "Compare device performance with predicates: {content}\n\n\
         Analyze performance data and substantial equivalence.",
    ),
    (
        "regulatory_strategist",
        "📊 Regulatory Strategy Advisor",
        "Provide regulatory strategy recommendations: {content}\n\n\
         Suggest optimal approval pathway and risk mitigation.",
    ),
    (
        "deficiency_analyzer",
        "❌ Deficiency Letter Generator",
        "Generate detailed deficiency letter based on review: {content}\n\n\
         Identify specific deficiencies and required responses.",
    ),
    (
        "timeline_planner",
        "📅 Submission Timeline Planner",
        "Create submission timeline and milestones: {content}\n\n\
         Plan review cycles and response timelines.",
    ),
    (
        "cost_estimator",
        "💰 Regulatory Cost Analyst",
        "Estimate regulatory costs and resources: {content}\n\n\
         Analyze FDA user fees and development costs.",
    ),
    (
        "competitor_analyst",
        "🏢 Market Analysis Specialist",
        "Analyze competitive landscape: {content}\n\n\
         Review similar devices and market positioning.",
    ),
    (
        "advisory_panel_prep",
        "👥 Advisory Panel Preparation",
        "Prepare for FDA advisory panel meeting: {content}\n\n\
         Develop presentation strategy and anticipate questions.",
    ),
    (
        "post_market_planner",
        "📈 Post-Market Strategy Planner",
        "Plan post-market surveillance strategy: {content}\n\n\
         Develop monitoring and reporting protocols.",
    ),
    (
        "international_harmonizer",
        "🌍 International Harmonization Expert",
        "Assess international regulatory alignment: {content}\n\n\
         Compare FDA requirements with EU MDR, Health Canada, etc.",
    ),
    (
        "innovation_assessor",
        "💡 Innovation Impact Evaluator",
        "Evaluate device innovation and novelty: {content}\n\n\
         Assess breakthrough designation potential.",
    ),
    (
        "training_developer",
        "🎓 Training Program Developer",
        "Develop regulatory training materials: {content}\n\n\
         Create educational content for submission teams.",
    ),
    (
        "audit_preparer",
        "📋 FDA Inspection Preparedness",
        "Prepare for FDA facility inspection: {content}\n\n\
         Develop inspection readiness protocols.",
    ),
    (
        "change_controller",
        "🔄 Change Control Specialist",
        "Assess device changes and regulatory impact: {content}\n\n\
         Determine if new 510(k) submission is required.",
    ),
    (
        "data_integrity",
        "🛡️ Data Integrity Auditor",
        "Review data integrity and ALCOA+ compliance: {content}\n\n\
         Assess data quality and regulatory acceptability.",
    ),
    (
        "summary_generator",
        "📝 Executive Summary Creator",
        "Create executive summary of submission: {content}\n\n\
         Highlight key points for senior management review.",
    ),
];

pub(crate) fn builtin_agents() -> Vec<AgentSpec> {
    BUILTIN_AGENTS
        .iter()
        .map(|(id, name, prompt)| AgentSpec::new(*id, *name, *prompt))
        .collect()
}
